//! Integration tests for page management.

use pdf_author::config::{DocumentOptions, Orientation, PageFormat, Unit};
use pdf_author::writer::Document;

fn doc_with_labels(labels: &[&str]) -> Document {
    let mut doc = Document::new(DocumentOptions::default()).unwrap();
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            doc.add_page(None, None).unwrap();
        }
        doc.comment(label);
    }
    doc
}

/// Page labels in output order.
fn label_order(doc: &mut Document, labels: &[&str]) -> Vec<String> {
    let pdf = doc.output_string().unwrap();
    let mut found: Vec<(usize, String)> = labels
        .iter()
        .filter_map(|l| pdf.find(&format!("%{}\n", l)).map(|pos| (pos, l.to_string())))
        .collect();
    found.sort();
    found.into_iter().map(|(_, l)| l).collect()
}

#[test]
fn test_move_page_and_back() {
    let labels = ["a", "b"];
    let mut doc = doc_with_labels(&labels);
    doc.move_page(1, 2);
    assert_eq!(label_order(&mut doc, &labels), vec!["b", "a"]);
    doc.move_page(2, 1);
    assert_eq!(label_order(&mut doc, &labels), vec!["a", "b"]);
}

#[test]
fn test_move_page_rotates_range() {
    let labels = ["a", "b", "c", "d"];
    let mut doc = doc_with_labels(&labels);
    doc.move_page(4, 1);
    assert_eq!(label_order(&mut doc, &labels), vec!["d", "a", "b", "c"]);
    assert_eq!(doc.current_page(), 1);
}

#[test]
fn test_insert_then_delete_restores_pages() {
    let labels = ["a", "b", "c"];
    let mut doc = doc_with_labels(&labels);
    doc.insert_page(2).unwrap();
    assert_eq!(doc.page_count(), 4);
    assert_eq!(doc.current_page(), 2);
    doc.comment("inserted");
    let with_insert = ["a", "b", "c", "inserted"];
    assert_eq!(label_order(&mut doc, &with_insert), vec!["a", "inserted", "b", "c"]);

    doc.delete_page(2);
    assert_eq!(doc.page_count(), 3);
    assert_eq!(label_order(&mut doc, &with_insert), vec!["a", "b", "c"]);
}

#[test]
fn test_out_of_range_page_operations_are_ignored() {
    let labels = ["a", "b"];
    let mut doc = doc_with_labels(&labels);
    doc.set_page(7);
    assert_eq!(doc.current_page(), 2);
    doc.delete_page(9);
    doc.move_page(1, 5);
    assert_eq!(doc.page_count(), 2);
    assert_eq!(label_order(&mut doc, &labels), vec!["a", "b"]);
    assert!(doc.page_info(3).is_err());
}

#[test]
fn test_orientation_symmetry() {
    let formats: Vec<PageFormat> = vec![
        "a4".into(),
        "A3".into(),
        "letter".into(),
        "legal".into(),
        "credit-card".into(),
        [300.0, 100.0].into(),
        [100.0, 300.0].into(),
    ];
    let mut doc = Document::new(DocumentOptions::default().with_unit(Unit::Pt)).unwrap();
    for format in formats {
        doc.add_page(Some(format.clone()), Some(Orientation::Landscape)).unwrap();
        let n = doc.current_page();
        assert!(doc.page_width(n).unwrap() >= doc.page_height(n).unwrap(), "{:?}", format);

        doc.add_page(Some(format.clone()), Some(Orientation::Portrait)).unwrap();
        let n = doc.current_page();
        assert!(doc.page_height(n).unwrap() >= doc.page_width(n).unwrap(), "{:?}", format);
    }
}

#[test]
fn test_oversized_page_is_clamped() {
    let mut doc = Document::new(DocumentOptions::default().with_unit(Unit::Pt)).unwrap();
    doc.add_page(Some([20000.0, 100.0].into()), Some(Orientation::Landscape))
        .unwrap();
    assert_eq!(doc.page_width(2).unwrap(), 14400.0);
}

#[test]
fn test_page_info_after_output() {
    let mut doc = Document::new(DocumentOptions::default()).unwrap();
    doc.add_page(None, None).unwrap();
    doc.output().unwrap();

    let second = doc.page_info(2).unwrap();
    assert_eq!(second.obj_id, 5);
    assert_eq!(second.context.contents_obj_id, 6);
    let found = doc.page_info_by_obj_id(5).unwrap().unwrap();
    assert_eq!(found.page_number, 2);
    assert!(doc.page_info_by_obj_id(6).unwrap().is_none());
}
