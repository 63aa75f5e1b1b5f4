//! Cell number formats from the xlsx package parts
//!
//! calamine only reports values, so the display format of each cell is resolved
//! here: `xl/styles.xml` maps a style index to a number format and every `<c s="..">`
//! element in a worksheet part names its style index.

use crate::error::CleanResult;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader as XmlReader;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const STYLES_PART: &str = "xl/styles.xml";

/// Number-format code per 0-based (row, column); cells in `General` are absent
pub(crate) type SheetFormats = HashMap<(u32, u32), String>;

/// Number formats for every worksheet, keyed by sheet name
///
/// Workbooks that are not xlsx packages (.xls, .xlsb, .ods) yield an empty map.
pub(crate) fn read_number_formats(bytes: &[u8]) -> CleanResult<HashMap<String, SheetFormats>> {
    let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive,
        Err(_) => return Ok(HashMap::new()),
    };

    let Some(workbook_xml) = read_part(&mut archive, WORKBOOK_PART)? else {
        return Ok(HashMap::new());
    };
    let Some(styles_xml) = read_part(&mut archive, STYLES_PART)? else {
        return Ok(HashMap::new());
    };
    let relationships = match read_part(&mut archive, WORKBOOK_RELS_PART)? {
        Some(xml) => parse_relationships(&xml)?,
        None => HashMap::new(),
    };
    let cell_formats = parse_cell_formats(&styles_xml)?;

    let mut sheets = HashMap::new();
    for (name, rel_id) in parse_sheets(&workbook_xml)? {
        let Some(target) = relationships.get(&rel_id) else {
            continue;
        };
        if let Some(sheet_xml) = read_part(&mut archive, &part_path(target))? {
            sheets.insert(name, parse_sheet_formats(&sheet_xml, &cell_formats)?);
        }
    }
    Ok(sheets)
}

fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> CleanResult<Option<Vec<u8>>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut xml = Vec::new();
            file.read_to_end(&mut xml)?;
            Ok(Some(xml))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Relationship targets are relative to `xl/` unless absolute
fn part_path(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if target.starts_with("xl/") {
        target.to_string()
    } else {
        format!("xl/{}", target)
    }
}

fn attribute(element: &BytesStart, key: &[u8]) -> CleanResult<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// `(sheet name, relationship id)` in workbook order
fn parse_sheets(xml: &[u8]) -> CleanResult<Vec<(String, String)>> {
    let mut reader = XmlReader::from_reader(xml);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                if let (Some(name), Some(id)) = (attribute(&e, b"name")?, attribute(&e, b"id")?) {
                    sheets.push((name, id));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(sheets)
}

/// Relationship id → target
fn parse_relationships(xml: &[u8]) -> CleanResult<HashMap<String, String>> {
    let mut reader = XmlReader::from_reader(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let id = attribute(&e, b"Id")?;
                if let (Some(id), Some(target)) = (id, attribute(&e, b"Target")?) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(targets)
}

/// Number format of each `cellXfs` entry, indexed by style id
fn parse_cell_formats(xml: &[u8]) -> CleanResult<Vec<Option<String>>> {
    let mut reader = XmlReader::from_reader(xml);
    let mut buf = Vec::new();
    let mut custom: HashMap<u32, String> = HashMap::new();
    let mut format_ids: Vec<u32> = Vec::new();
    let (mut in_num_fmts, mut in_cell_xfs) = (false, false);

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"numFmts" => in_num_fmts = true,
                b"cellXfs" => in_cell_xfs = true,
                b"numFmt" if in_num_fmts => insert_num_fmt(&e, &mut custom)?,
                b"xf" if in_cell_xfs => format_ids.push(num_fmt_id(&e)?),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"numFmt" if in_num_fmts => insert_num_fmt(&e, &mut custom)?,
                b"xf" if in_cell_xfs => format_ids.push(num_fmt_id(&e)?),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"numFmts" => in_num_fmts = false,
                b"cellXfs" => in_cell_xfs = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(format_ids
        .into_iter()
        .map(|id| {
            custom
                .get(&id)
                .cloned()
                .or_else(|| builtin_format(id).map(str::to_string))
                .filter(|code| !code.eq_ignore_ascii_case("General"))
        })
        .collect())
}

fn insert_num_fmt(element: &BytesStart, custom: &mut HashMap<u32, String>) -> CleanResult<()> {
    if let Some(code) = attribute(element, b"formatCode")? {
        custom.insert(num_fmt_id(element)?, code);
    }
    Ok(())
}

fn num_fmt_id(element: &BytesStart) -> CleanResult<u32> {
    Ok(attribute(element, b"numFmtId")?
        .and_then(|id| id.parse().ok())
        .unwrap_or(0))
}

/// Resolve the style of every `<c>` element in a worksheet part
fn parse_sheet_formats(xml: &[u8], cell_formats: &[Option<String>]) -> CleanResult<SheetFormats> {
    let mut reader = XmlReader::from_reader(xml);
    let mut buf = Vec::new();
    let mut formats = SheetFormats::new();
    // Fallback position for rows and cells written without an `r` attribute
    let (mut row, mut col): (u32, u32) = (0, 0);
    let mut seen_row = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    row = match attribute(&e, b"r")?.and_then(|r| r.parse::<u32>().ok()) {
                        Some(r) => r.saturating_sub(1),
                        None if seen_row => row + 1,
                        None => 0,
                    };
                    seen_row = true;
                    col = 0;
                }
                b"c" => {
                    let position = attribute(&e, b"r")?
                        .and_then(|r| parse_reference(&r))
                        .unwrap_or((row, col));
                    col = position.1 + 1;

                    let style = attribute(&e, b"s")?
                        .and_then(|s| s.parse::<usize>().ok())
                        .unwrap_or(0);
                    if let Some(Some(code)) = cell_formats.get(style) {
                        formats.insert(position, code.clone());
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(formats)
}

/// `B3` → `(2, 1)`
fn parse_reference(reference: &str) -> Option<(u32, u32)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + u32::from(b.to_ascii_uppercase() - b'A' + 1);
    }
    let row: u32 = digits.parse().ok()?;
    Some((row.checked_sub(1)?, col - 1))
}

/// Excel's built-in number formats (en-US)
fn builtin_format(id: u32) -> Option<&'static str> {
    let code = match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        5 => "($#,##0_);($#,##0)",
        6 => "($#,##0_);[Red]($#,##0)",
        7 => "($#,##0.00_);($#,##0.00)",
        8 => "($#,##0.00_);[Red]($#,##0.00)",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "m/d/yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "(#,##0_);(#,##0)",
        38 => "(#,##0_);[Red](#,##0)",
        39 => "(#,##0.00_);(#,##0.00)",
        40 => "(#,##0.00_);[Red](#,##0.00)",
        41 => r#"_(* #,##0_);_(* (#,##0);_(* "-"_);_(@_)"#,
        42 => r#"_($* #,##0_);_($* (#,##0);_($* "-"_);_(@_)"#,
        43 => r#"_(* #,##0.00_);_(* (#,##0.00);_(* "-"??_);_(@_)"#,
        44 => r#"_($* #,##0.00_);_($* (#,##0.00);_($* "-"??_);_(@_)"#,
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mm:ss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    };
    Some(code)
}
