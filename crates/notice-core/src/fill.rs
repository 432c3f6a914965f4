//! AcroForm template filling
//!
//! Loads the fixed notice template, sets `/V` on every form field whose
//! partial name appears in the field map, and authors a normal appearance
//! stream per filled field so the value renders the same in every viewer
//! (and so the flattener has a stream to merge).

use crate::error::NoticeError;
use crate::fields::FieldMap;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

/// Output filename policy: `{row_index}_{address_1}_3day.pdf` with spaces in
/// the address replaced by underscores. `row_index` is the zero-based row
/// position, which also makes filenames unique within a run.
pub fn artifact_file_name(row_index: usize, address_1: &str) -> String {
    format!("{}_{}_3day.pdf", row_index, address_1.replace(' ', "_"))
}

/// Escape special characters for PDF string literals
fn escape_pdf_string(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '(' => "\\(".to_string(),
            ')' => "\\)".to_string(),
            '\\' => "\\\\".to_string(),
            _ if c.is_ascii() => c.to_string(),
            _ => "?".to_string(), // Replace non-ASCII with ?
        })
        .collect()
}

/// Fill the template's named form fields from `fields` and write the result
/// to `output` (overwriting it if present).
///
/// Template fields absent from the map keep their default value; map keys
/// with no matching field are ignored.
pub fn fill_template(
    template: &Path,
    fields: &FieldMap,
    output: &Path,
) -> Result<(), NoticeError> {
    let mut doc = Document::load(template).map_err(|e| {
        NoticeError::Fill(format!(
            "failed to load template {}: {}",
            template.display(),
            e
        ))
    })?;

    let field_ids = form_field_ids(&doc)?;

    // Read-only scan first: which fields match the map, and where they sit.
    let mut matched: Vec<(ObjectId, String, Option<[f32; 4]>)> = Vec::new();
    for field_id in field_ids {
        let field = match doc.get_object(field_id).and_then(Object::as_dict) {
            Ok(dict) => dict,
            Err(_) => continue,
        };
        let name = match field.get(b"T") {
            Ok(Object::String(bytes, _)) => String::from_utf8_lossy(bytes).into_owned(),
            _ => continue,
        };
        let Some(value) = fields.get(&name) else {
            continue;
        };
        let rect = field.get(b"Rect").ok().and_then(rect_values);
        matched.push((field_id, value.clone(), rect));
    }

    for (field_id, value, rect) in matched {
        let appearance_id = rect.map(|r| doc.add_object(appearance_stream(&value, r)));

        let field = doc
            .get_object_mut(field_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| NoticeError::Fill(format!("field object is not a dictionary: {}", e)))?;

        field.set(
            "V",
            Object::String(value.into_bytes(), lopdf::StringFormat::Literal),
        );
        if let Some(stream_id) = appearance_id {
            let mut ap = Dictionary::new();
            ap.set("N", Object::Reference(stream_id));
            field.set("AP", Object::Dictionary(ap));
        }
    }

    doc.save(output)
        .map_err(|e| NoticeError::Fill(format!("failed to save {}: {}", output.display(), e)))?;

    Ok(())
}

/// All field object ids reachable from the AcroForm Fields array, including
/// nested /Kids.
fn form_field_ids(doc: &Document) -> Result<Vec<ObjectId>, NoticeError> {
    let catalog = doc
        .catalog()
        .map_err(|e| NoticeError::Fill(format!("no document catalog: {}", e)))?;

    let acroform = catalog
        .get(b"AcroForm")
        .map_err(|_| NoticeError::Fill("template has no AcroForm".into()))?;
    let acroform = match acroform {
        Object::Reference(id) => doc
            .get_object(*id)
            .and_then(Object::as_dict)
            .map_err(|e| NoticeError::Fill(format!("invalid AcroForm: {}", e)))?,
        Object::Dictionary(dict) => dict,
        _ => return Err(NoticeError::Fill("invalid AcroForm".into())),
    };

    let fields = acroform
        .get(b"Fields")
        .and_then(Object::as_array)
        .map_err(|_| NoticeError::Fill("AcroForm has no Fields array".into()))?;

    let mut ids = Vec::new();
    collect_field_ids(doc, fields, &mut ids);
    Ok(ids)
}

fn collect_field_ids(doc: &Document, entries: &[Object], out: &mut Vec<ObjectId>) {
    for entry in entries {
        let Ok(id) = entry.as_reference() else {
            continue;
        };
        out.push(id);
        if let Ok(kids) = doc
            .get_object(id)
            .and_then(Object::as_dict)
            .and_then(|dict| dict.get(b"Kids"))
            .and_then(Object::as_array)
        {
            collect_field_ids(doc, kids, out);
        }
    }
}

/// Parse a /Rect array into `[x1, y1, x2, y2]`.
pub(crate) fn rect_values(obj: &Object) -> Option<[f32; 4]> {
    let arr = obj.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }
    let mut values = [0f32; 4];
    for (i, entry) in arr.iter().enumerate() {
        values[i] = match entry {
            Object::Real(v) => *v,
            Object::Integer(v) => *v as f32,
            _ => return None,
        };
    }
    Some(values)
}

/// Build the normal appearance: a Form XObject drawing the value in
/// Helvetica, sized to the widget rect.
fn appearance_stream(value: &str, rect: [f32; 4]) -> Object {
    let width = (rect[2] - rect[0]).abs();
    let height = (rect[3] - rect[1]).abs();
    let font_size = (height * 0.7).clamp(6.0, 12.0);
    let baseline = ((height - font_size) / 2.0).max(1.0);
    let text = escape_pdf_string(value);

    let content = format!(
        "q\nBT\n/F1 {fs} Tf\n0 g\n2 {y} Td\n({text}) Tj\nET\nQ",
        fs = font_size,
        y = baseline,
        text = text,
    );

    let mut stream_dict = Dictionary::new();
    stream_dict.set("Type", Object::Name(b"XObject".to_vec()));
    stream_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    stream_dict.set("FormType", Object::Integer(1));
    stream_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(width),
            Object::Real(height),
        ]),
    );
    stream_dict.set(
        "Matrix",
        Object::Array(vec![
            Object::Integer(1),
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(1),
            Object::Integer(0),
            Object::Integer(0),
        ]),
    );

    let mut resources = Dictionary::new();
    let mut font_dict = Dictionary::new();
    let mut f1_dict = Dictionary::new();
    f1_dict.set("Type", Object::Name(b"Font".to_vec()));
    f1_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    f1_dict.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font_dict.set("F1", Object::Dictionary(f1_dict));
    resources.set("Font", Object::Dictionary(font_dict));
    stream_dict.set("Resources", Object::Dictionary(resources));

    Object::Stream(Stream::new(stream_dict, content.into_bytes()))
}
