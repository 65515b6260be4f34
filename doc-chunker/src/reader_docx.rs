use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use chapter_model::Alignment;
use crate::paragraphs::{SourceParagraph, StyledRun};

/// Errors raised while opening or reading a .docx file.
#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    #[error("failed to open `{path}`: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{path}` is not a valid .docx (zip) archive: {source}")]
    Archive {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("`{path}` has no word/document.xml part")]
    MissingDocument { path: String },
    #[error("failed to read `{name}` from `{path}`: {source}")]
    Part {
        path: String,
        name: String,
        #[source]
        source: std::io::Error,
    },
}

fn local_name(q: &[u8]) -> &[u8] {
    match q.iter().position(|&b| b == b':') {
        Some(i) => &q[i + 1..],
        None => q,
    }
}

fn attr_val(e: &BytesStart<'_>, key_local: &[u8]) -> Option<String> {
    for a in e.attributes().with_checks(false) {
        if let Ok(attr) = a {
            if local_name(attr.key.as_ref()) == key_local {
                return Some(String::from_utf8_lossy(&attr.value).into_owned());
            }
        }
    }
    None
}

// OOXML boolean properties are "on" when the val attribute is absent.
fn flag_on(val: Option<String>) -> bool {
    match val.as_deref() {
        None => true,
        Some(v) => !matches!(v, "0" | "false" | "none" | "off"),
    }
}

fn map_alignment(val: Option<String>) -> Option<Alignment> {
    match val.as_deref() {
        Some("left") | Some("start") => Some(Alignment::Left),
        Some("center") => Some(Alignment::Center),
        Some("right") | Some("end") => Some(Alignment::Right),
        Some("both") | Some("justify") | Some("distribute") => Some(Alignment::Justify),
        _ => None,
    }
}

/// Read paragraphs with their styled runs, alignment and style names from a
/// .docx file. Opens the zip, parses word/document.xml and resolves style ids
/// against word/styles.xml so callers see display names like "Heading 1".
pub fn read_docx(path: &str) -> Result<Vec<SourceParagraph>, DocxError> {
    let file = File::open(path).map_err(|source| DocxError::Open { path: path.to_string(), source })?;
    read_docx_from(file, path)
}

/// Same as [`read_docx`] for any seekable byte source; `label` names the
/// source in errors.
pub fn read_docx_from<R: Read + Seek>(reader: R, label: &str) -> Result<Vec<SourceParagraph>, DocxError> {
    let mut zip = zip::ZipArchive::new(reader)
        .map_err(|source| DocxError::Archive { path: label.to_string(), source })?;

    let styles = match read_zip_part(&mut zip, label, "word/styles.xml")? {
        Some(xml) => parse_style_names(&xml),
        None => BTreeMap::new(),
    };
    let doc_xml = read_zip_part(&mut zip, label, "word/document.xml")?
        .ok_or_else(|| DocxError::MissingDocument { path: label.to_string() })?;

    Ok(parse_document_xml(&doc_xml, &styles))
}

fn read_zip_part<R: Read + Seek>(
    zip: &mut zip::ZipArchive<R>,
    path: &str,
    name: &str,
) -> Result<Option<String>, DocxError> {
    let mut part = match zip.by_name(name) {
        Ok(p) => p,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(source) => return Err(DocxError::Archive { path: path.to_string(), source }),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml).map_err(|source| DocxError::Part {
        path: path.to_string(),
        name: name.to_string(),
        source,
    })?;
    Ok(Some(xml))
}

/// Map styleId -> display name from word/styles.xml, e.g. "Heading1" -> "Heading 1".
fn parse_style_names(styles_xml: &str) -> BTreeMap<String, String> {
    let mut reader = Reader::from_str(styles_xml);
    let mut buf = Vec::new();
    let mut names = BTreeMap::new();
    let mut current_id: Option<String> = None;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match local_name(e.name().as_ref()) {
                b"style" => current_id = attr_val(&e, b"styleId"),
                b"name" => {
                    if let (Some(id), Some(name)) = (current_id.as_ref(), attr_val(&e, b"val")) {
                        names.insert(id.clone(), name);
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if local_name(e.name().as_ref()) == b"style" {
                    current_id = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }
    names
}

fn parse_document_xml(doc_xml: &str, styles: &BTreeMap<String, String>) -> Vec<SourceParagraph> {
    let mut reader = Reader::from_str(doc_xml);
    let mut buf = Vec::new();

    let mut paragraphs: Vec<SourceParagraph> = Vec::new();

    let mut in_p = false;
    let mut in_run = false;
    let mut in_run_props = false;
    let mut in_t = false;

    let mut para_align: Option<Alignment> = None;
    let mut para_style_id: Option<String> = None;
    let mut runs: Vec<StyledRun> = Vec::new();

    let mut run_text = String::new();
    let mut run_bold = false;
    let mut run_size: Option<f32> = None;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                b"p" => {
                    in_p = true;
                    para_align = None;
                    para_style_id = None;
                    runs.clear();
                }
                b"r" if in_p => {
                    in_run = true;
                    run_text.clear();
                    run_bold = false;
                    run_size = None;
                }
                b"rPr" if in_run => in_run_props = true,
                b"t" if in_run => in_t = true,
                b"jc" if in_p && !in_run => para_align = map_alignment(attr_val(&e, b"val")),
                b"pStyle" if in_p && !in_run => para_style_id = attr_val(&e, b"val"),
                b"b" if in_run_props => run_bold = flag_on(attr_val(&e, b"val")),
                b"sz" if in_run_props => {
                    // w:sz is in half-points
                    run_size = attr_val(&e, b"val")
                        .and_then(|v| v.parse::<f32>().ok())
                        .map(|half| half / 2.0);
                }
                b"br" | b"cr" if in_run => run_text.push('\n'),
                b"tab" if in_run => run_text.push('\t'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match local_name(e.name().as_ref()) {
                b"p" => paragraphs.push(SourceParagraph::default()),
                b"jc" if in_p && !in_run => para_align = map_alignment(attr_val(&e, b"val")),
                b"pStyle" if in_p && !in_run => para_style_id = attr_val(&e, b"val"),
                b"b" if in_run_props => run_bold = flag_on(attr_val(&e, b"val")),
                b"sz" if in_run_props => {
                    run_size = attr_val(&e, b"val")
                        .and_then(|v| v.parse::<f32>().ok())
                        .map(|half| half / 2.0);
                }
                b"br" | b"cr" if in_run => run_text.push('\n'),
                b"tab" if in_run => run_text.push('\t'),
                _ => {}
            },
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"t" => in_t = false,
                b"rPr" => in_run_props = false,
                b"r" => {
                    if in_run {
                        runs.push(StyledRun::new(std::mem::take(&mut run_text), run_bold, run_size));
                        in_run = false;
                    }
                }
                b"p" => {
                    if in_p {
                        let text: String = runs.iter().map(|r| r.text.as_str()).collect();
                        let style = para_style_id
                            .take()
                            .map(|id| styles.get(&id).cloned().unwrap_or(id))
                            .unwrap_or_default();
                        paragraphs.push(SourceParagraph {
                            text,
                            align: para_align.take(),
                            style,
                            runs: std::mem::take(&mut runs),
                        });
                        in_p = false;
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if in_t {
                    if let Ok(cow) = t.unescape() {
                        run_text.push_str(&cow);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    paragraphs
}
