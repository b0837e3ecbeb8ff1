use std::fmt::Formatter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Notation(pub String);

impl std::fmt::Display for A1Notation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<A1Notation> for String {
    fn from(a1_notation: A1Notation) -> Self {
        a1_notation.0
    }
}

impl AsRef<str> for A1Notation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for A1Notation {
    fn from(s: String) -> Self {
        A1Notation(s)
    }
}

/// Sheet titles are always quoted; embedded quotes are doubled.
fn quote_sheet_title(sheet_title: &str) -> String {
    format!("'{}'", sheet_title.replace('\'', "''"))
}

impl A1Notation {
    /// Every cell of a worksheet.
    ///
    /// ```
    /// use campaign_sheets_sync::domain::sheets::a1_notation::A1Notation;
    ///
    /// assert_eq!(A1Notation::whole_sheet("Campaigns").as_ref(), "'Campaigns'");
    /// ```
    pub fn whole_sheet(sheet_title: &str) -> Self {
        A1Notation(quote_sheet_title(sheet_title))
    }

    /// Top-left cell of a worksheet, the anchor for bulk writes.
    pub fn origin(sheet_title: &str) -> Self {
        A1Notation(format!("{}!A1", quote_sheet_title(sheet_title)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        assert_eq!(A1Notation::origin("Campaigns").to_string(), "'Campaigns'!A1");
    }

    #[test]
    fn test_title_with_spaces_and_quotes() {
        assert_eq!(
            A1Notation::origin("Q1 Client's sheet").as_ref(),
            "'Q1 Client''s sheet'!A1"
        );
        assert_eq!(
            A1Notation::whole_sheet("Client's").as_ref(),
            "'Client''s'"
        );
    }

    #[test]
    fn test_into_string() {
        let s: String = A1Notation::origin("X").into();
        assert_eq!(s, "'X'!A1");
    }
}
