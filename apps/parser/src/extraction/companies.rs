//! Parsing of the free-text company listing used by the work-experience fallback.

/// One position named by the model: a company and the role held there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub company: String,
    pub role: String,
}

/// Parses `company, role` lines.
///
/// Lines mentioning "answer" in any case are the model echoing the instructions
/// and are dropped, as are lines whose company field is empty. A missing role
/// becomes an empty string.
pub fn parse_positions(listing: &str) -> Vec<Position> {
    listing
        .lines()
        .filter(|line| !line.to_lowercase().contains("answer"))
        .filter_map(|line| {
            let mut fields = line.split(',');
            let company = fields.next().unwrap_or_default().trim();
            if company.is_empty() {
                return None;
            }
            let role = fields.next().unwrap_or_default().trim();
            Some(Position {
                company: company.to_string(),
                role: role.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positions() {
        let listing = "Acme Corp, Backend Engineer\nGlobex\nInitech, QA, contractor\n";
        assert_eq!(
            parse_positions(listing),
            vec![
                Position {
                    company: "Acme Corp".to_string(),
                    role: "Backend Engineer".to_string()
                },
                Position {
                    company: "Globex".to_string(),
                    role: String::new()
                },
                Position {
                    company: "Initech".to_string(),
                    role: "QA".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_instruction_echoes_are_skipped() {
        let listing = "ANSWER:\nHere is the answer, as requested\nAcme Corp, CTO";
        let positions = parse_positions(listing);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].company, "Acme Corp");
    }

    #[test]
    fn test_empty_company_lines_are_skipped() {
        let listing = "\n   \n, Orphan Role\n  , Another\nGlobex, Analyst\n";
        let positions = parse_positions(listing);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].role, "Analyst");
    }
}
