//! Text extraction from downloaded document bytes.

use docseek_core::{AppError, AppResult};

/// Extract the text layer of a PDF.
///
/// `pdf-extract` can panic on malformed files, so the call is isolated and a
/// panic is reported as a decode error for this document only.
pub fn decode_pdf(bytes: &[u8]) -> AppResult<String> {
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(AppError::Decode(format!("Failed to extract PDF text: {}", e))),
        Err(_) => Err(AppError::Decode(
            "PDF extraction panicked (malformed or unsupported PDF)".to_string(),
        )),
    }
}

/// Decode plain text, dropping invalid UTF-8 sequences.
///
/// Dropped bytes leave no trace, so a word split by a stray byte is
/// matched as one word.
pub fn decode_text(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Run PDF extraction off the async executor.
pub(crate) async fn decode_pdf_blocking(bytes: Vec<u8>) -> AppResult<String> {
    tokio::task::spawn_blocking(move || decode_pdf(&bytes))
        .await
        .map_err(|e| AppError::Decode(format!("PDF extraction task failed: {}", e)))?
}
