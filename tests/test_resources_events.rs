//! Integration tests for resource deduplication, lifecycle events and plugins.

use std::cell::RefCell;
use std::rc::Rc;

use pdf_author::config::{DocumentOptions, Unit};
use pdf_author::events::{Event, Topic};
use pdf_author::writer::{
    ColorStop, Document, DocumentCore, GState, PathStyle, PatternData, Plugin, ShadingPattern,
    StreamOptions,
};
use pdf_author::Result;

fn doc() -> Document {
    Document::new(DocumentOptions::default().with_unit(Unit::Pt)).unwrap()
}

#[test]
fn test_equal_gstates_share_one_object() {
    let mut doc = doc();
    let a = doc.add_gstate(Some("faded"), GState::new().opacity(0.3));
    let b = doc.add_gstate(Some("ghost"), GState::new().opacity(0.3));
    let c = doc.add_gstate(Some("solid"), GState::new().opacity(1.0));
    assert_eq!(a, b);
    assert_ne!(a, c);

    doc.set_gstate_by_key("ghost").unwrap();
    let pdf = doc.output_string().unwrap();
    assert_eq!(pdf.matches("/ca 0.30").count(), 1);
    assert_eq!(pdf.matches("/ca 1.00").count(), 1);
    assert!(pdf.contains(&format!("/{} gs", a)));
}

#[test]
fn test_keyless_gstate_keeps_user_key() {
    let mut doc = doc();
    let named = doc.add_gstate(Some("GS2"), GState::new().opacity(0.3));
    assert_eq!(named, "GS1");
    let minted = doc.add_gstate(None, GState::new().opacity(0.7));
    assert_eq!(minted, "GS2");

    doc.set_gstate_by_key("GS2").unwrap();
    let pdf = doc.output_string().unwrap();
    assert!(pdf.contains("/GS1 gs"));
    assert!(!pdf.contains("/GS2 gs"));
}

#[test]
fn test_equal_shadings_share_one_name() {
    let mut doc = doc();
    let stops = || vec![ColorStop::new(0.0, [0, 0, 0]), ColorStop::new(1.0, [255, 255, 255])];
    let first = doc
        .add_shading_pattern("one", ShadingPattern::axial([0.0, 0.0, 50.0, 0.0], stops()))
        .unwrap();
    let second = doc
        .add_shading_pattern("two", ShadingPattern::axial([0.0, 0.0, 50.0, 0.0], stops()))
        .unwrap();
    assert_eq!(first, second);

    doc.rect(0.0, 0.0, 50.0, 50.0, Some(PathStyle::Fill), Some(PatternData::new("two")))
        .unwrap();
    let pdf = doc.output_string().unwrap();
    assert_eq!(pdf.matches("/ShadingType 2").count(), 1);
}

#[test]
fn test_failing_subscriber_does_not_stop_others() {
    let mut doc = doc();
    let seen = Rc::new(RefCell::new(Vec::new()));

    doc.subscribe(Topic::AddPage, |_d: &mut Document, _e: &Event| Err("plugin exploded".into()), false)
        .unwrap();
    let log = Rc::clone(&seen);
    doc.subscribe(
        Topic::AddPage,
        move |_d: &mut Document, e: &Event| {
            if let Event::AddPage { page_number } = e {
                log.borrow_mut().push(*page_number);
            }
            Ok(())
        },
        false,
    )
    .unwrap();

    doc.add_page(None, None).unwrap();
    doc.add_page(None, None).unwrap();
    assert_eq!(*seen.borrow(), vec![2, 3]);
}

#[test]
fn test_once_subscription_fires_once() {
    let mut doc = doc();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    doc.subscribe(
        Topic::BuildDocument,
        move |_d: &mut Document, _e: &Event| {
            *counter.borrow_mut() += 1;
            Ok(())
        },
        true,
    )
    .unwrap();

    doc.output().unwrap();
    doc.output().unwrap();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_unsubscribe() {
    let mut doc = doc();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let token = doc
        .subscribe(
            Topic::AddPage,
            move |_d: &mut Document, _e: &Event| {
                *counter.borrow_mut() += 1;
                Ok(())
            },
            false,
        )
        .unwrap();
    doc.add_page(None, None).unwrap();
    assert!(doc.unsubscribe(token));
    doc.add_page(None, None).unwrap();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_custom_topic_requires_name() {
    let mut doc = doc();
    let err = doc.subscribe(Topic::Custom("  ".into()), |_d: &mut Document, _e: &Event| Ok(()), false);
    assert!(err.is_err());
}

/// Writes a `/Lang` entry into the catalog and an extra object after the page tree.
struct LanguagePlugin;

impl Plugin for LanguagePlugin {
    fn install(&self, doc: &mut Document) -> Result<()> {
        doc.subscribe(
            Topic::PutCatalog,
            |d: &mut Document, _e: &Event| {
                DocumentCore::out(d, b"/Lang (en-GB)");
                Ok(())
            },
            false,
        )?;
        doc.subscribe(
            Topic::PutAdditionalObjects,
            |d: &mut Document, _e: &Event| {
                let id = d.new_additional_object();
                d.set_additional_object_content(id, b"<< /Note (extra) >>")?;
                Ok(())
            },
            false,
        )?;
        doc.subscribe(
            Topic::PostPutResources,
            |d: &mut Document, _e: &Event| {
                let id = DocumentCore::new_object(d);
                d.put_stream(&StreamOptions::new("metadata").entry("Type", "/Metadata"))?;
                d.out("endobj");
                log::debug!("metadata object {}", id);
                Ok(())
            },
            false,
        )?;
        Ok(())
    }
}

#[test]
fn test_plugin_writes_during_output() {
    let plugins: [&dyn Plugin; 1] = [&LanguagePlugin];
    let mut doc = Document::with_plugins(DocumentOptions::default(), &plugins).unwrap();
    let pdf = doc.output_string().unwrap();
    assert!(pdf.contains("/Type /Catalog\n/Pages 1 0 R\n"));
    assert!(pdf.contains("/Lang (en-GB)\n>>\nendobj"));
    assert!(pdf.contains(" 0 obj\n<< /Note (extra) >>\nendobj"));
    assert!(pdf.contains("/Type /Metadata\n/Length 8\n>>\nstream\nmetadata\nendstream"));
}
