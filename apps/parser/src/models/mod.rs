pub mod entries;
pub mod output;

pub use entries::{Education, Extractable, WorkExperience};
pub use output::{OutputRecord, SectionField};
