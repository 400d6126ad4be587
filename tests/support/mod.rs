#![allow(dead_code)]

use medbrief::extraction::fixtures::build_pdf;

/// Build a single-page PDF that shows `line`.
pub fn one_page_pdf(line: &str) -> Vec<u8> {
    build_pdf(&[line]).expect("build pdf")
}

/// Encode a multipart body with a single `file` part.
pub fn file_form(boundary: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
