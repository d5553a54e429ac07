use serde::Deserialize;
use serde_json::Value;

// Read model for the parts of the spreadsheet resource the client uses.
// Fields not listed here are ignored on deserialisation.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub properties: SpreadsheetProperties,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    pub spreadsheet_url: Option<String>,
}

impl Spreadsheet {
    pub fn title(&self) -> &str {
        &self.properties.title
    }

    pub fn sheet_by_title(&self, title: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.properties.title == title)
    }

    /// Sheet at tab position `index`, not its position in `sheets`
    pub fn sheet_by_index(&self, index: u32) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.properties.index == index)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetProperties {
    #[serde(default)]
    pub title: String,
    pub locale: Option<String>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

impl Sheet {
    pub fn sheet_id(&self) -> i64 {
        self.properties.sheet_id
    }

    pub fn row_count(&self) -> u32 {
        self.properties.grid_properties.as_ref().map_or(0, |grid| grid.row_count)
    }

    pub fn column_count(&self) -> u32 {
        self.properties.grid_properties.as_ref().map_or(0, |grid| grid.column_count)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub index: u32,
    pub grid_properties: Option<GridProperties>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default)]
    pub row_count: u32,
    #[serde(default)]
    pub column_count: u32,
}

/// Response to one batchUpdate call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    pub spreadsheet_id: String,
    /// One reply per request, in request order
    #[serde(default)]
    pub replies: Vec<Value>,
}

/// Error envelope returned with non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPREADSHEET_JSON: &str = r#"{
        "spreadsheetId": "1Q5jSop27MzBdhir",
        "properties": { "title": "Budget", "locale": "en_US", "timeZone": "Asia/Seoul", "autoRecalc": "ON_CHANGE" },
        "sheets": [
            { "properties": { "sheetId": 0, "title": "Sheet1", "index": 0, "sheetType": "GRID",
                              "gridProperties": { "rowCount": 1000, "columnCount": 26 } } },
            { "properties": { "sheetId": 1873, "title": "Totals", "index": 1,
                              "gridProperties": { "rowCount": 50, "columnCount": 4 } } }
        ],
        "spreadsheetUrl": "https://docs.google.com/spreadsheets/d/1Q5jSop27MzBdhir/edit"
    }"#;

    #[test]
    fn test_spreadsheet_deserialization() {
        let spreadsheet: Spreadsheet = serde_json::from_str(SPREADSHEET_JSON).unwrap();

        assert_eq!(spreadsheet.spreadsheet_id, "1Q5jSop27MzBdhir");
        assert_eq!(spreadsheet.title(), "Budget");
        assert_eq!(spreadsheet.properties.time_zone.as_deref(), Some("Asia/Seoul"));
        assert_eq!(spreadsheet.sheets.len(), 2);
    }

    #[test]
    fn test_sheet_lookup() {
        let spreadsheet: Spreadsheet = serde_json::from_str(SPREADSHEET_JSON).unwrap();

        let totals = spreadsheet.sheet_by_title("Totals").unwrap();
        assert_eq!(totals.sheet_id(), 1873);
        assert_eq!(totals.row_count(), 50);
        assert_eq!(totals.column_count(), 4);

        assert_eq!(spreadsheet.sheet_by_index(0).unwrap().properties.title, "Sheet1");
        assert!(spreadsheet.sheet_by_title("Missing").is_none());
        assert!(spreadsheet.sheet_by_index(7).is_none());
    }

    #[test]
    fn test_minimal_spreadsheet() {
        let spreadsheet: Spreadsheet = serde_json::from_str(r#"{ "spreadsheetId": "abc" }"#).unwrap();
        assert_eq!(spreadsheet.title(), "");
        assert!(spreadsheet.sheets.is_empty());
    }

    #[test]
    fn test_batch_update_response() {
        let json = r#"{ "spreadsheetId": "abc", "replies": [{}, { "addSheet": { "properties": { "sheetId": 7 } } }] }"#;
        let response: BatchUpdateResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.spreadsheet_id, "abc");
        assert_eq!(response.replies.len(), 2);
        assert_eq!(response.replies[1]["addSheet"]["properties"]["sheetId"], 7);
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{ "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" } }"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();

        assert_eq!(envelope.error.code, 429);
        assert_eq!(envelope.error.message, "Quota exceeded");
    }
}
