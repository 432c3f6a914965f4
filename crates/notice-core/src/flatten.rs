//! Form flattening
//!
//! Some PDF viewers render unflattened filled forms with opaque black boxes
//! over the field values, so flattening is a correctness step here, not an
//! optimization. Each widget annotation's normal appearance stream is drawn
//! into the page's static content at the widget position, the widgets are
//! stripped from /Annots, and the AcroForm is removed from the catalog.
//! After that the values are fixed page content and no longer editable.

use crate::error::NoticeError;
use crate::fill::rect_values;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

/// Flatten a filled notice in place.
///
/// Idempotent: a flattened document has no widget annotations left, so a
/// second pass finds nothing to merge and the output is visually identical.
pub fn flatten_notice(path: &Path) -> Result<(), NoticeError> {
    let mut doc = Document::load(path).map_err(|e| {
        NoticeError::Flatten(format!("failed to load {}: {}", path.display(), e))
    })?;

    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    for page_id in pages {
        flatten_page(&mut doc, page_id)?;
    }

    if let Ok(catalog) = doc.catalog_mut() {
        catalog.remove(b"AcroForm");
    }

    // Drop the now-unreferenced field dictionaries and form tree.
    doc.prune_objects();

    doc.save(path)
        .map_err(|e| NoticeError::Flatten(format!("failed to save {}: {}", path.display(), e)))?;

    Ok(())
}

fn flatten_page(doc: &mut Document, page_id: ObjectId) -> Result<(), NoticeError> {
    let annots = page_annotations(doc, page_id)?;
    if annots.is_empty() {
        return Ok(());
    }

    // Split the widgets (with their appearance and position) from every
    // other annotation kind, which stays on the page.
    let mut widgets: Vec<(ObjectId, f32, f32)> = Vec::new();
    let mut kept: Vec<Object> = Vec::new();
    for annot_ref in &annots {
        let Ok(annot_id) = annot_ref.as_reference() else {
            kept.push(annot_ref.clone());
            continue;
        };
        let Ok(annot) = doc.get_object(annot_id).and_then(Object::as_dict) else {
            kept.push(annot_ref.clone());
            continue;
        };

        let is_widget = matches!(annot.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Widget");
        if !is_widget {
            kept.push(annot_ref.clone());
            continue;
        }

        // A widget with no usable appearance draws nothing; it is dropped
        // from the page either way.
        if let Some(stream_id) = normal_appearance(doc, annot) {
            if let Some(rect) = annot.get(b"Rect").ok().and_then(rect_values) {
                widgets.push((stream_id, rect[0].min(rect[2]), rect[1].min(rect[3])));
            }
        }
    }

    if !widgets.is_empty() {
        let mut draw_ops = String::new();
        for (i, (stream_id, x, y)) in widgets.iter().enumerate() {
            let name = format!("FlatFld{}", i);
            add_page_xobject(doc, page_id, &name, *stream_id)?;
            // Appearance streams are authored with a zero-origin BBox, so a
            // plain translation to the widget's rect corner places them.
            draw_ops.push_str(&format!("q\n1 0 0 1 {} {} cm\n/{} Do\nQ\n", x, y, name));
        }
        wrap_page_contents(doc, page_id, &draw_ops)?;
    }

    set_page_annotations(doc, page_id, kept)?;
    Ok(())
}

/// The page's /Annots entries, whether stored inline or behind a reference.
fn page_annotations(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>, NoticeError> {
    let page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| NoticeError::Flatten(format!("page is not a dictionary: {}", e)))?;

    let annots = match page.get(b"Annots") {
        Ok(Object::Array(arr)) => arr.clone(),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_array)
            .map_err(|e| NoticeError::Flatten(format!("invalid Annots array: {}", e)))?
            .clone(),
        _ => Vec::new(),
    };
    Ok(annots)
}

fn set_page_annotations(
    doc: &mut Document,
    page_id: ObjectId,
    annots: Vec<Object>,
) -> Result<(), NoticeError> {
    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| NoticeError::Flatten(format!("page is not a dictionary: {}", e)))?;

    if annots.is_empty() {
        page.remove(b"Annots");
    } else {
        page.set("Annots", Object::Array(annots));
    }
    Ok(())
}

/// Resolve a widget's normal appearance stream, following checkbox-style
/// state dictionaries through /AS.
fn normal_appearance(doc: &Document, annot: &Dictionary) -> Option<ObjectId> {
    let ap = annot.get(b"AP").ok()?;
    let ap = match ap {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    match ap.get(b"N").ok()? {
        Object::Reference(id) => Some(*id),
        Object::Dictionary(states) => {
            let state = match annot.get(b"AS") {
                Ok(Object::Name(name)) => name.clone(),
                _ => return None,
            };
            states.get(&state).ok()?.as_reference().ok()
        }
        _ => None,
    }
}

/// Register `stream_id` under `name` in the page's XObject resources,
/// whether the resource dictionary is inline, referenced, or absent.
fn add_page_xobject(
    doc: &mut Document,
    page_id: ObjectId,
    name: &str,
    stream_id: ObjectId,
) -> Result<(), NoticeError> {
    let (resources_ref, mut resources) = {
        let page = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|e| NoticeError::Flatten(format!("page is not a dictionary: {}", e)))?;
        match page.get(b"Resources") {
            Ok(Object::Reference(id)) => {
                let dict = doc
                    .get_object(*id)
                    .and_then(Object::as_dict)
                    .map_err(|e| NoticeError::Flatten(format!("invalid Resources: {}", e)))?
                    .clone();
                (Some(*id), dict)
            }
            Ok(Object::Dictionary(dict)) => (None, dict.clone()),
            _ => (None, Dictionary::new()),
        }
    };

    let mut xobjects = match resources.get(b"XObject") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => match doc.get_object(*id).and_then(Object::as_dict) {
            Ok(dict) => dict.clone(),
            Err(_) => Dictionary::new(),
        },
        _ => Dictionary::new(),
    };
    xobjects.set(name, Object::Reference(stream_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    match resources_ref {
        Some(id) => {
            let target = doc
                .get_object_mut(id)
                .map_err(|e| NoticeError::Flatten(format!("invalid Resources: {}", e)))?;
            *target = Object::Dictionary(resources);
        }
        None => {
            let page = doc
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| NoticeError::Flatten(format!("page is not a dictionary: {}", e)))?;
            page.set("Resources", Object::Dictionary(resources));
        }
    }
    Ok(())
}

/// Bracket the existing content in `q`/`Q` so its final graphics state can't
/// leak into the merged appearances, then append the draw operations.
fn wrap_page_contents(
    doc: &mut Document,
    page_id: ObjectId,
    draw_ops: &str,
) -> Result<(), NoticeError> {
    let existing = {
        let page = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|e| NoticeError::Flatten(format!("page is not a dictionary: {}", e)))?;
        match page.get(b"Contents") {
            Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
            Ok(Object::Array(arr)) => arr.clone(),
            _ => Vec::new(),
        }
    };

    let pre_id = doc.add_object(Object::Stream(Stream::new(
        Dictionary::new(),
        b"q\n".to_vec(),
    )));
    let post_id = doc.add_object(Object::Stream(Stream::new(
        Dictionary::new(),
        format!("Q\n{}", draw_ops).into_bytes(),
    )));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(pre_id));
    contents.extend(existing);
    contents.push(Object::Reference(post_id));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| NoticeError::Flatten(format!("page is not a dictionary: {}", e)))?;
    page.set("Contents", Object::Array(contents));
    Ok(())
}
