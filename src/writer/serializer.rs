//! Document serialization.
//!
//! [`Document::output`] rebuilds the whole file on every call: object numbers and offsets
//! are reset, pages get fresh numbers, and everything is written in a fixed order
//!
//! ```text
//! header
//! pages (page dict, content stream)*, page tree root
//! additional objects
//! fonts, graphics states, form xobjects, patterns, shared resource dictionary
//! info, catalog
//! xref, trailer
//! ```
//!
//! so that every offset in the cross-reference table is known when the table is written.

use std::path::Path;

use crate::error::Result;
use crate::events::Event;
use crate::number::{hpf, js_number};
use crate::VERSION;

use super::document::{Destination, Document};
use super::escape::pdf_escape;
use super::page::PageBoxKind;
use super::pattern::{interpolate_and_encode_rgb_stream, Pattern, ShadingPattern, TilingPattern, SHADING_SAMPLES};
use super::stream::StreamOptions;

const BINARY_MARKER: [u8; 5] = [b'%', 0xba, 0xdf, 0xac, 0xe0];

fn bbox(values: &[f64]) -> Result<String> {
    let values = values.iter().map(|v| hpf(*v)).collect::<Result<Vec<_>>>()?;
    Ok(format!("[{}]", values.join(" ")))
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Document {
    /// Serialize the document.
    ///
    /// Drawing may continue afterwards; the output cursor goes back to the current page
    /// even when serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_author::config::DocumentOptions;
    /// use pdf_author::writer::Document;
    ///
    /// let mut doc = Document::new(DocumentOptions::default()).unwrap();
    /// let bytes = doc.output().unwrap();
    /// assert!(bytes.starts_with(b"%PDF-1.3\n"));
    /// assert!(bytes.ends_with(b"%%EOF"));
    /// ```
    pub fn output(&mut self) -> Result<Vec<u8>> {
        self.reset_document();
        self.destination = Destination::Document;
        let built = self.build_document();
        self.destination = Destination::Page(self.current_page);

        let mut bytes = std::mem::take(&mut self.buffer);
        built?;
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        log::debug!("serialized {} objects, {} bytes", self.objects.count(), bytes.len());
        Ok(bytes)
    }

    /// [`Document::output`] as a string, one char per byte.
    pub fn output_string(&mut self) -> Result<String> {
        Ok(self.output()?.iter().map(|&b| char::from(b)).collect())
    }

    /// Serialize the document to `path`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.output()?;
        std::fs::write(path.as_ref(), bytes)?;
        log::info!("saved {}", path.as_ref().display());
        Ok(())
    }

    fn build_document(&mut self) -> Result<()> {
        self.publish(&Event::BuildDocument);

        self.out(format!("%PDF-{}", self.pdf_version));
        self.out(BINARY_MARKER);
        self.put_pages()?;
        self.put_additional_objects();
        self.put_resources()?;
        let info = self.put_info()?;
        let catalog = self.put_catalog()?;

        let xref_offset = self.buffer.len();
        self.put_xref();
        self.out("trailer");
        self.out(format!(
            "<< /Size {} /Root {} 0 R /Info {} 0 R /ID [ <{}> <{}> ] >>",
            self.objects.count() + 1,
            catalog,
            info,
            self.file_id,
            self.file_id
        ));
        self.out("startxref");
        self.out(xref_offset.to_string());
        self.out("%%EOF");
        Ok(())
    }

    fn put_pages(&mut self) -> Result<()> {
        for index in 0..self.pages.len() {
            let obj_id = self.reserve_object();
            let contents_obj_id = self.reserve_object();
            let context = &mut self.pages[index].context;
            context.obj_id = obj_id;
            context.contents_obj_id = contents_obj_id;
        }
        for index in 0..self.pages.len() {
            self.put_page(index)?;
        }

        let kids: String = self
            .pages
            .iter()
            .map(|p| format!("{} 0 R ", p.context.obj_id))
            .collect();
        let count = self.pages.len();
        self.begin_object(self.root_dictionary_obj_id, true);
        self.out("<</Type /Pages");
        self.out(format!("/Kids [{}]", kids));
        self.out(format!("/Count {}", count));
        self.out(">>");
        self.out("endobj");
        self.publish(&Event::PostPutPages);
        Ok(())
    }

    fn put_page(&mut self, index: usize) -> Result<()> {
        let page = &self.pages[index];
        let context = page.context.clone();
        let content = page.content_bytes();

        self.begin_object(context.obj_id, true);
        self.out("<</Type /Page");
        self.out(format!("/Parent {} 0 R", self.root_dictionary_obj_id));
        self.out(format!("/Resources {} 0 R", self.resource_dictionary_obj_id));
        self.out(format!("/MediaBox {}", context.media_box.to_array(true)?));
        for kind in [PageBoxKind::Crop, PageBoxKind::Bleed, PageBoxKind::Trim, PageBoxKind::Art] {
            if let Some(page_box) = context.page_box(kind) {
                self.out(format!("/{} {}", kind.key(), page_box.to_array(false)?));
            }
        }
        if !context.annotations.is_empty() {
            let refs: Vec<String> = context.annotations.iter().map(|id| format!("{} 0 R", id)).collect();
            self.out(format!("/Annots [{}]", refs.join(" ")));
        }
        if context.user_unit != 1.0 {
            self.out(format!("/UserUnit {}", js_number(context.user_unit)));
        }
        self.publish(&Event::PutPage {
            page_number: index + 1,
            obj_id: context.obj_id,
            contents_obj_id: context.contents_obj_id,
        });
        self.out(format!("/Contents {} 0 R", context.contents_obj_id));
        self.out(">>");
        self.out("endobj");

        self.begin_object(context.contents_obj_id, true);
        self.put_stream(&StreamOptions::new(content))?;
        self.out("endobj");
        Ok(())
    }

    fn put_additional_objects(&mut self) {
        self.publish(&Event::PutAdditionalObjects);
        let objects = self.additional_objects.clone();
        for object in objects {
            self.begin_object(object.id, true);
            self.out(&object.content);
            self.out("endobj");
        }
        self.publish(&Event::PostPutAdditionalObjects);
    }

    fn font_is_listed(&self, key: &str) -> bool {
        !self.put_only_used_fonts || self.fonts.is_used(key)
    }

    fn put_resources(&mut self) -> Result<()> {
        self.fonts.clear_object_numbers();
        for resource in self.gstates.iter_mut() {
            resource.object_number = None;
        }
        for resource in self.patterns.iter_mut() {
            resource.object_number = None;
        }
        for resource in self.form_objects.iter_mut() {
            resource.object_number = None;
        }

        self.put_fonts()?;
        self.put_gstates()?;
        self.put_form_objects()?;
        self.put_patterns()?;
        self.publish(&Event::PutResources);

        self.begin_object(self.resource_dictionary_obj_id, true);
        self.put_resource_dictionary_body();
        self.out("endobj");
        self.publish(&Event::PostPutResources);
        Ok(())
    }

    fn put_fonts(&mut self) -> Result<()> {
        let keys: Vec<String> = self
            .fonts
            .iter()
            .map(|f| f.key.clone())
            .filter(|k| self.font_is_listed(k))
            .collect();

        for key in keys {
            self.publish(&Event::PutFont { key: key.clone() });
            let Some(font) = self.fonts.get(&key) else {
                continue;
            };
            if font.is_already_put {
                continue;
            }
            let post_script_name = font.post_script_name.clone();
            let encoding = font.encoding.clone();

            let id = self.new_object();
            self.fonts.set_object_number(&key, id);
            let escaped = pdf_escape(&post_script_name, false)?;
            let mut base_font = b"/BaseFont /".to_vec();
            if post_script_name.contains(' ') {
                base_font.push(b'(');
                base_font.extend(escaped);
                base_font.push(b')');
            } else {
                base_font.extend(escaped);
            }

            self.out("<<");
            self.out("/Type /Font");
            self.out(base_font);
            self.out("/Subtype /Type1");
            if let Some(encoding) = encoding {
                self.out(format!("/Encoding /{}", encoding));
            }
            self.out("/FirstChar 32");
            self.out("/LastChar 255");
            self.out(">>");
            self.out("endobj");
        }
        Ok(())
    }

    fn put_gstates(&mut self) -> Result<()> {
        for name in self.gstates.names() {
            let Some(entries) = self.gstates.by_name(&name).map(|r| r.value.entries()) else {
                continue;
            };
            let entries = entries?;
            let id = self.new_object();
            if let Some(resource) = self.gstates.by_name_mut(&name) {
                resource.object_number = Some(id);
            }
            self.out("<<");
            for entry in entries {
                self.out(entry);
            }
            self.out(">>");
            self.out("endobj");
        }
        Ok(())
    }

    fn put_form_objects(&mut self) -> Result<()> {
        for name in self.form_objects.names() {
            let Some(form) = self.form_objects.by_name(&name).map(|r| r.value.clone()) else {
                continue;
            };
            let id = self.new_object();
            if let Some(resource) = self.form_objects.by_name_mut(&name) {
                resource.object_number = Some(id);
            }
            let options = StreamOptions::new(form.content)
                .entry("Type", "/XObject")
                .entry("Subtype", "/Form")
                .entry(
                    "BBox",
                    bbox(&[form.x, form.y, form.x + form.width, form.y + form.height])?,
                )
                .entry("Matrix", format!("[{}]", form.matrix));
            self.put_stream(&options)?;
            self.out("endobj");
        }
        Ok(())
    }

    fn put_patterns(&mut self) -> Result<()> {
        for name in self.patterns.names() {
            let Some(pattern) = self.patterns.by_name(&name).map(|r| r.value.clone()) else {
                continue;
            };
            let id = match pattern {
                Pattern::Shading(shading) => self.put_shading_pattern(&shading)?,
                Pattern::Tiling(tiling) => self.put_tiling_pattern(tiling)?,
            };
            if let Some(resource) = self.patterns.by_name_mut(&name) {
                resource.object_number = Some(id);
            }
        }
        Ok(())
    }

    fn put_shading_pattern(&mut self, pattern: &ShadingPattern) -> Result<u32> {
        let function = self.new_object();
        let samples = interpolate_and_encode_rgb_stream(&pattern.colors, SHADING_SAMPLES);
        let options = StreamOptions::new(samples)
            .entry("FunctionType", "0")
            .entry("Domain", "[0.0 1.0]")
            .entry("Size", format!("[{}]", SHADING_SAMPLES))
            .entry("BitsPerSample", "8")
            .entry("Range", "[0.0 1.0 0.0 1.0 0.0 1.0]")
            .entry("Decode", "[0.0 1.0 0.0 1.0 0.0 1.0]")
            .with_already_applied(["/ASCIIHexDecode"]);
        self.put_stream(&options)?;
        self.out("endobj");

        let id = self.new_object();
        self.out(format!("<< /ShadingType {}", pattern.shading_type as u8));
        self.out("/ColorSpace /DeviceRGB");
        let coords = pattern.coords.iter().map(|c| hpf(*c)).collect::<Result<Vec<_>>>()?;
        self.out(format!("/Coords [{}]", coords.join(" ")));
        if let Some(matrix) = pattern.matrix {
            self.out(format!("/Matrix [{}]", matrix));
        }
        self.out(format!("/Function {} 0 R", function));
        self.out("/Extend [true true]");
        self.out(">>");
        self.out("endobj");
        Ok(id)
    }

    fn put_tiling_pattern(&mut self, pattern: TilingPattern) -> Result<u32> {
        // the cell gets its own copy of the resource dictionary
        let resources = self.new_object();
        self.put_resource_dictionary_body();
        self.out("endobj");

        let id = self.new_object();
        let mut options = StreamOptions::new(pattern.stream)
            .entry("Type", "/Pattern")
            .entry("PatternType", "1")
            .entry("PaintType", "1")
            .entry("TilingType", "1")
            .entry("BBox", bbox(&pattern.bounding_box)?)
            .entry("XStep", hpf(pattern.x_step)?)
            .entry("YStep", hpf(pattern.y_step)?)
            .entry("Resources", format!("{} 0 R", resources));
        if let Some(matrix) = pattern.matrix {
            options = options.entry("Matrix", format!("[{}]", matrix));
        }
        self.put_stream(&options)?;
        self.out("endobj");
        Ok(id)
    }

    fn put_resource_dictionary_body(&mut self) {
        self.out("<<");
        self.out("/ProcSet [/PDF /Text /ImageB /ImageC /ImageI]");

        self.out("/Font <<");
        let fonts: Vec<String> = self
            .fonts
            .iter()
            .filter(|f| self.font_is_listed(&f.key))
            .filter_map(|f| f.object_number.map(|n| format!("/{} {} 0 R", f.key, n)))
            .collect();
        for line in fonts {
            self.out(line);
        }
        self.out(">>");

        if !self.patterns.is_empty() {
            let (shadings, tilings): (Vec<_>, Vec<_>) = self
                .patterns
                .iter()
                .filter_map(|r| {
                    r.object_number
                        .map(|n| (matches!(r.value, Pattern::Shading(_)), format!("/{} {} 0 R", r.name, n)))
                })
                .partition(|(is_shading, _)| *is_shading);

            self.out("/Shading <<");
            for (_, line) in shadings {
                self.out(line);
            }
            self.publish(&Event::PutShadingPatternDict);
            self.out(">>");

            self.out("/Pattern <<");
            for (_, line) in tilings {
                self.out(line);
            }
            self.publish(&Event::PutTilingPatternDict);
            self.out(">>");
        }

        if !self.gstates.is_empty() {
            let lines: Vec<String> = self
                .gstates
                .iter()
                .filter_map(|r| r.object_number.map(|n| format!("/{} {} 0 R", r.name, n)))
                .collect();
            self.out("/ExtGState <<");
            for line in lines {
                self.out(line);
            }
            self.publish(&Event::PutGStateDict);
            self.out(">>");
        }

        let xobjects: Vec<String> = self
            .form_objects
            .iter()
            .filter_map(|r| r.object_number.map(|n| format!("/{} {} 0 R", r.name, n)))
            .collect();
        self.out("/XObject <<");
        for line in xobjects {
            self.out(line);
        }
        self.publish(&Event::PutXObjectDict);
        self.out(">>");

        self.out(">>");
    }

    fn put_info(&mut self) -> Result<u32> {
        let id = self.new_object();
        self.out("<<");
        self.out(format!("/Producer (pdf_author {})", VERSION));
        let properties: Vec<(String, String)> = self
            .properties
            .entries()
            .into_iter()
            .map(|(k, v)| (capitalize(k), v.to_string()))
            .collect();
        for (key, value) in properties {
            let mut line = format!("/{} (", key).into_bytes();
            line.extend(pdf_escape(&value, true)?);
            line.push(b')');
            self.out(line);
        }
        self.out(format!("/CreationDate ({})", self.creation_date));
        self.out(">>");
        self.out("endobj");
        Ok(id)
    }

    fn put_catalog(&mut self) -> Result<u32> {
        let id = self.new_object();
        let first_page = self.pages.first().map(|p| p.context.obj_id).unwrap_or(0);
        let destination = self.zoom_mode.unwrap_or_default().destination()?;

        self.out("<<");
        self.out("/Type /Catalog");
        self.out(format!("/Pages {} 0 R", self.root_dictionary_obj_id));
        self.out(format!("/OpenAction [{} 0 R {}]", first_page, destination));
        self.out(format!("/PageLayout /{}", self.layout_mode.pdf_name()));
        if let Some(page_mode) = self.page_mode {
            self.out(format!("/PageMode /{}", page_mode));
        }
        self.publish(&Event::PutCatalog);
        self.out(">>");
        self.out("endobj");
        Ok(id)
    }

    fn put_xref(&mut self) {
        let offsets = self.objects.offsets(self.buffer.len());
        self.out("xref");
        self.out(format!("0 {}", self.objects.count() + 1));
        self.out("0000000000 65535 f ");
        for offset in offsets {
            self.out(format!("{:010} 00000 n ", offset));
        }
    }
}
