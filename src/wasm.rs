use wasm_bindgen::prelude::*;

use crate::model::{ExportFormat, ResumeRecord, UserType};
use crate::FolioError;

fn to_js(e: FolioError) -> JsValue {
    log::warn!("export failed: {}", e);
    JsValue::from_str(e.user_message())
}

fn parse_record(record: JsValue) -> Result<ResumeRecord, JsValue> {
    serde_wasm_bindgen::from_value(record).map_err(|e| {
        log::warn!("invalid resume record: {}", e);
        JsValue::from_str(FolioError::InvalidInput(String::new()).user_message())
    })
}

fn parse_user_type(user_type: &str) -> Result<UserType, JsValue> {
    user_type.parse().map_err(to_js)
}

#[wasm_bindgen]
pub fn export_pdf(record: JsValue, user_type: &str) -> Result<Vec<u8>, JsValue> {
    let record = parse_record(record)?;
    crate::export_pdf(&record, parse_user_type(user_type)?).map_err(to_js)
}

#[wasm_bindgen]
pub fn export_word(record: JsValue, user_type: &str) -> Result<Vec<u8>, JsValue> {
    let record = parse_record(record)?;
    crate::export_word(&record, parse_user_type(user_type)?).map_err(to_js)
}

#[wasm_bindgen]
pub fn export_filename(name: &str, target_role: Option<String>, format: &str) -> Result<String, JsValue> {
    let format: ExportFormat = format.parse().map_err(to_js)?;
    Ok(crate::export_filename(name, target_role.as_deref(), format))
}
