//! Just enough `multipart/form-data` parsing to pull one uploaded file out of a request body.

/// One file part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name, if the part declared one.
    pub field_name: Option<String>,
    pub filename: String,
    pub data: Vec<u8>,
}

/// The `boundary` parameter of a `multipart/form-data` content type.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    let mut params = content_type.split(';');
    let mime = params.next()?.trim();
    if !mime.eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }
    params
        .filter_map(|p| header_param(p, "boundary"))
        .find(|b| !b.is_empty())
}

/// The first part that carries a `filename`, or `None` when the body holds no file.
pub fn first_file_part(body: &[u8], boundary: &str) -> Option<FilePart> {
    let delimiter = format!("--{boundary}").into_bytes();
    let next_delimiter = format!("\r\n--{boundary}").into_bytes();

    let mut pos = find(body, &delimiter, 0)? + delimiter.len();
    loop {
        // Closing delimiter.
        if body[pos..].starts_with(b"--") {
            return None;
        }
        let part_start = if body[pos..].starts_with(b"\r\n") { pos + 2 } else { pos };
        let part_end = find(body, &next_delimiter, part_start)?;
        let part = &body[part_start..part_end];

        if let Some(file) = parse_part(part) {
            return Some(file);
        }
        pos = part_end + next_delimiter.len();
    }
}

fn parse_part(part: &[u8]) -> Option<FilePart> {
    let header_end = find(part, b"\r\n\r\n", 0)?;
    let headers = String::from_utf8_lossy(&part[..header_end]);
    let disposition = headers.split("\r\n").find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("content-disposition")
            .then(|| value.trim().to_string())
    })?;

    let mut field_name = None;
    let mut filename = None;
    for param in disposition.split(';').skip(1) {
        if let Some(v) = header_param(param, "filename") {
            filename = Some(v);
        } else if let Some(v) = header_param(param, "name") {
            field_name = Some(v);
        }
    }

    Some(FilePart {
        field_name,
        filename: filename?,
        data: part[header_end + 4..].to_vec(),
    })
}

/// Value of `key=value` / `key="value"` if `param` is that key.
fn header_param(param: &str, key: &str) -> Option<String> {
    let (k, v) = param.trim().split_once('=')?;
    if !k.trim().eq_ignore_ascii_case(key) {
        return None;
    }
    let v = v.trim();
    let v = v
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(v);
    Some(v.to_string())
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}
