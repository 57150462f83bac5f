//! Redirecting drawing into form XObjects and tiling pattern cells.
//!
//! A render target swaps the document's page list for a single scratch page sized to the
//! target, runs the drawing closure, and swaps the saved pages back. Targets nest.

use std::mem;

use crate::error::{Error, Result};
use crate::events::Event;
use crate::geometry::Matrix;

use super::document::{Destination, Document};
use super::page::Page;
use super::pattern::{Pattern, TilingPattern};

/// Page state saved while a render target is active.
#[derive(Debug, Clone)]
pub(crate) struct RenderTarget {
    pages: Vec<Page>,
    current_page: usize,
    page_x: f64,
    page_y: f64,
    page_matrix: Option<Matrix>,
    destination: Destination,
}

/// A recorded form XObject.
#[derive(Debug, Clone, PartialEq)]
pub struct FormObject {
    /// Left edge of the bounding box
    pub x: f64,
    /// Bottom edge of the bounding box
    pub y: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
    /// Form space to user space
    pub matrix: Matrix,
    /// Recorded content stream
    pub content: Vec<u8>,
}

impl Document {
    pub(crate) fn begin_render_target(&mut self, x: f64, y: f64, width: f64, height: f64, matrix: Matrix) {
        self.render_target_stack.push(RenderTarget {
            pages: mem::take(&mut self.pages),
            current_page: self.current_page,
            page_x: self.page_x,
            page_y: self.page_y,
            page_matrix: self.page_matrix,
            destination: self.destination,
        });
        log::trace!("render target {} opened", self.render_target_stack.len());

        self.current_page = 0;
        self.page_x = x;
        self.page_y = y;
        self.page_matrix = Some(matrix);
        // no orientation swap or size ceiling for scratch pages
        self.push_page(self.scale(width), self.scale(height));
    }

    /// Restore the saved page state and hand back the recorded pages.
    pub(crate) fn restore_render_target(&mut self) -> Result<Vec<Page>> {
        let saved = self
            .render_target_stack
            .pop()
            .ok_or_else(|| Error::RenderTarget("no render target to restore".to_string()))?;
        let recorded = mem::replace(&mut self.pages, saved.pages);
        self.current_page = saved.current_page;
        self.page_x = saved.page_x;
        self.page_y = saved.page_y;
        self.page_matrix = saved.page_matrix;
        self.destination = saved.destination;
        Ok(recorded)
    }

    /// Run `draw` against a scratch page, then restore the saved pages whether or not
    /// `draw` or `finish` failed.
    fn record<T>(
        &mut self,
        frame: (f64, f64, f64, f64),
        matrix: Matrix,
        draw: impl FnOnce(&mut Document) -> Result<()>,
        finish: impl FnOnce(&mut Document) -> Result<T>,
    ) -> Result<T> {
        let (x, y, width, height) = frame;
        self.begin_render_target(x, y, width, height, matrix);
        let result = draw(self).and_then(|()| finish(self));
        self.restore_render_target()?;
        result
    }

    fn recorded_content(&self) -> Vec<u8> {
        self.page(1).map(Page::content_bytes).unwrap_or_default()
    }

    /// Record `draw` as a reusable form XObject under `key` and return its name (`Xo<n>`).
    ///
    /// The box is `(x, y, width, height)` in document units. Recording again under a key
    /// that exists keeps the first form.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_author::config::DocumentOptions;
    /// use pdf_author::geometry::Matrix;
    /// use pdf_author::writer::{Document, PathStyle};
    ///
    /// let mut doc = Document::new(DocumentOptions::default()).unwrap();
    /// let name = doc
    ///     .form_object("badge", 0.0, 0.0, 20.0, 10.0, None, |d| {
    ///         d.rect(0.0, 0.0, 20.0, 10.0, Some(PathStyle::Fill), None)
    ///     })
    ///     .unwrap();
    /// assert_eq!(name, "Xo1");
    /// doc.do_form_object("badge", &Matrix::identity()).unwrap();
    /// ```
    pub fn form_object(
        &mut self,
        key: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        matrix: Option<Matrix>,
        draw: impl FnOnce(&mut Document) -> Result<()>,
    ) -> Result<String> {
        if [x, y, width, height].iter().any(|v| v.is_nan()) {
            return Err(Error::invalid_argument("Invalid arguments passed to form_object"));
        }
        let matrix = matrix.unwrap_or_else(Matrix::identity);
        let key = key.to_string();
        self.record((x, y, width, height), matrix, draw, move |doc| {
            if let Some(name) = doc.form_objects.name_for(&key) {
                return Ok(name.to_string());
            }
            let name = format!("Xo{}", doc.form_objects.len() + 1);
            let form = FormObject {
                x: doc.page_x,
                y: doc.page_y,
                width,
                height,
                matrix: doc.page_matrix.unwrap_or_else(Matrix::identity),
                content: doc.recorded_content(),
            };
            doc.form_objects.insert_keyed(key.clone(), name.clone(), form);
            doc.publish(&Event::AddFormObject {
                key,
                name: name.clone(),
            });
            Ok(name)
        })
    }

    /// Paint the form XObject registered under `key` with `matrix` applied.
    pub fn do_form_object(&mut self, key: &str, matrix: &Matrix) -> Result<()> {
        let name = self
            .form_objects
            .name_for(key)
            .map(str::to_string)
            .ok_or_else(|| Error::invalid_argument(format!("Invalid argument passed to do_form_object: unknown key '{}'", key)))?;
        self.out("q");
        self.out(format!("{} cm", matrix));
        self.out(format!("/{} Do", name));
        self.out("Q");
        Ok(())
    }

    /// The form XObject registered under `key`.
    pub fn form_object_info(&self, key: &str) -> Option<&FormObject> {
        self.form_objects.get(key).map(|r| &r.value)
    }

    /// Record `draw` as the cell of `pattern` and register the pattern under `key`.
    ///
    /// The scratch page spans the pattern's bounding box.
    pub fn tiling_pattern(
        &mut self,
        key: &str,
        pattern: TilingPattern,
        draw: impl FnOnce(&mut Document) -> Result<()>,
    ) -> Result<String> {
        let [x1, y1, x2, y2] = pattern.bounding_box;
        let matrix = pattern.matrix.unwrap_or_else(Matrix::identity);
        let key = key.to_string();
        self.record((x1, y1, x2 - x1, y2 - y1), matrix, draw, move |doc| {
            let mut pattern = pattern;
            pattern.stream = doc.recorded_content();
            let name = doc.add_pattern(&key, Pattern::Tiling(pattern));
            doc.publish(&Event::EndTilingPattern {
                key,
                name: name.clone(),
            });
            Ok(name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DocumentOptions, Unit};
    use crate::writer::drawing::PathStyle;

    fn pt_doc() -> Document {
        Document::new(DocumentOptions::default().with_unit(Unit::Pt)).unwrap()
    }

    #[test]
    fn test_form_object_records_and_restores() {
        let mut doc = pt_doc();
        doc.add_page(None, None).unwrap();
        let before = doc.page(2).unwrap().content.len();

        let name = doc
            .form_object("box", 5.0, 5.0, 20.0, 10.0, None, |d| {
                assert_eq!(d.page_count(), 1);
                d.rect(0.0, 0.0, 20.0, 10.0, Some(PathStyle::Fill), None)
            })
            .unwrap();

        assert_eq!(name, "Xo1");
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.current_page(), 2);
        assert_eq!(doc.page(2).unwrap().content.len(), before);
        assert!(doc.render_target_stack.is_empty());

        let form = doc.form_object_info("box").unwrap();
        assert_eq!((form.x, form.y, form.width, form.height), (5.0, 5.0, 20.0, 10.0));
        assert_eq!(form.content, b"0.00 10.00 20.00 -10.00 re\nf");
    }

    #[test]
    fn test_existing_key_keeps_first_form() {
        let mut doc = pt_doc();
        doc.form_object("k", 0.0, 0.0, 1.0, 1.0, None, |_| Ok(())).unwrap();
        let again = doc
            .form_object("k", 0.0, 0.0, 2.0, 2.0, None, |d| d.line(0.0, 0.0, 1.0, 1.0))
            .unwrap();
        assert_eq!(again, "Xo1");
        assert_eq!(doc.form_objects.len(), 1);
        assert_eq!(doc.form_object_info("k").unwrap().width, 1.0);
    }

    #[test]
    fn test_failed_drawing_still_restores() {
        let mut doc = pt_doc();
        let err = doc.form_object("bad", 0.0, 0.0, 1.0, 1.0, None, |d| {
            d.rect(f64::NAN, 0.0, 1.0, 1.0, None, None)
        });
        assert!(err.is_err());
        assert_eq!(doc.page_count(), 1);
        assert!(doc.render_target_stack.is_empty());
        assert!(doc.form_object_info("bad").is_none());
    }

    #[test]
    fn test_do_form_object() {
        let mut doc = pt_doc();
        doc.form_object("k", 0.0, 0.0, 1.0, 1.0, None, |_| Ok(())).unwrap();
        doc.do_form_object("k", &Matrix::new(2.0, 0.0, 0.0, 2.0, 10.0, 10.0)).unwrap();
        let tail: Vec<&[u8]> = doc.page(1).unwrap().content[2..].iter().map(Vec::as_slice).collect();
        assert_eq!(tail, vec![&b"q"[..], b"2 0 0 2 10 10 cm", b"/Xo1 Do", b"Q"]);
        assert!(doc.do_form_object("nope", &Matrix::identity()).is_err());
    }

    #[test]
    fn test_tiling_pattern_records_cell() {
        let mut doc = pt_doc();
        let name = doc
            .tiling_pattern("dots", TilingPattern::new([0.0, 0.0, 4.0, 4.0], 4.0, 4.0), |d| {
                d.rect(0.0, 0.0, 2.0, 2.0, Some(PathStyle::Fill), None)
            })
            .unwrap();
        assert_eq!(name, "P1");
        match &doc.patterns.get("dots").unwrap().value {
            Pattern::Tiling(t) => assert_eq!(t.stream, b"0.00 4.00 2.00 -2.00 re\nf"),
            other => panic!("unexpected pattern {:?}", other),
        }
    }

    #[test]
    fn test_restore_without_target_fails() {
        let mut doc = pt_doc();
        assert!(matches!(doc.restore_render_target(), Err(Error::RenderTarget(_))));
    }
}
