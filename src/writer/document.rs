//! The document model: object allocation, output routing, pages and metadata.
//!
//! A [`Document`] buffers drawing operators per page while it is being authored. Nothing
//! is numbered until [`Document::output`] runs; every call to it resets the object table
//! and writes the whole file again from scratch.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::{paper_size, DocumentOptions, Orientation, PageFormat};
use crate::date::{parse_pdf_date, resolve_creation_date, CreationDate};
use crate::error::{Error, Result};
use crate::events::{publish_within, Event, EventBus, SubscriberResult, SubscriptionToken, Topic};
use crate::filters::parse_chain;
use crate::geometry::Matrix;
use crate::object::ObjectTable;

use super::display::{LayoutMode, PageMode, ZoomMode};
use super::drawing::{LineCapStyle, LineJoinStyle};
use super::font_manager::FontRegistry;
use super::graphics_state::GState;
use super::page::{page_dimensions, Page, PageBox, PageBoxKind, PageInfo};
use super::pattern::Pattern;
use super::render_target::{FormObject, RenderTarget};
use super::resources::ResourceRegistry;
use super::stream::{encode_stream, StreamOptions};

/// Version written into the header when none is set.
pub const DEFAULT_PDF_VERSION: &str = "1.3";

/// Line width in document units for a new document.
pub const DEFAULT_LINE_WIDTH: f64 = 0.200025;

const A4_POINTS: (f64, f64) = (595.28, 841.89);

/// Where [`Document::out`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Destination {
    /// Content of the 1-based page
    Page(usize),
    /// The file being serialized
    Document,
}

/// An object reserved now and written after the page tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AdditionalObject {
    pub(crate) id: u32,
    pub(crate) content: Vec<u8>,
}

/// Info dictionary entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentProperties {
    /// `/Title`
    pub title: String,
    /// `/Subject`
    pub subject: String,
    /// `/Author`
    pub author: String,
    /// `/Keywords`
    pub keywords: String,
    /// `/Creator`
    pub creator: String,
}

impl DocumentProperties {
    /// Property names, in the order they are written.
    pub const KEYS: [&'static str; 5] = ["title", "subject", "author", "keywords", "creator"];

    fn field(&self, key: &str) -> Option<&String> {
        match key {
            "title" => Some(&self.title),
            "subject" => Some(&self.subject),
            "author" => Some(&self.author),
            "keywords" => Some(&self.keywords),
            "creator" => Some(&self.creator),
            _ => None,
        }
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "title" => Some(&mut self.title),
            "subject" => Some(&mut self.subject),
            "author" => Some(&mut self.author),
            "keywords" => Some(&mut self.keywords),
            "creator" => Some(&mut self.creator),
            _ => None,
        }
    }

    /// Non-empty entries as (key, value), in [`Self::KEYS`] order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        Self::KEYS
            .iter()
            .filter_map(|key| {
                self.field(key)
                    .filter(|v| !v.is_empty())
                    .map(|v| (*key, v.as_str()))
            })
            .collect()
    }
}

/// An extension installed into a document before its first page exists.
///
/// Plugins usually subscribe to lifecycle topics so they can initialise per-page state on
/// [`Topic::AddPage`] and write their objects during output.
pub trait Plugin {
    /// Hook into `doc`.
    fn install(&self, doc: &mut Document) -> Result<()>;
}

/// The primitives extensions build on.
///
/// [`Document`] implements it by delegating to its inherent methods of the same name.
pub trait DocumentCore {
    /// Reserve the next object number without writing anything.
    fn reserve_object(&mut self) -> u32;
    /// Record the offset of `id` and optionally write its `n 0 obj` line.
    fn begin_object(&mut self, id: u32, emit: bool);
    /// Reserve and begin an object.
    fn new_object(&mut self) -> u32;
    /// Reserve an object whose content is written after the page tree.
    fn new_additional_object(&mut self) -> u32;
    /// Set the content of an additional object.
    fn set_additional_object_content(&mut self, id: u32, content: &[u8]) -> Result<()>;
    /// Write one line to the current destination.
    fn out(&mut self, line: &[u8]);
    /// Write a stream body and dictionary.
    fn put_stream(&mut self, options: &StreamOptions) -> Result<()>;
    /// The page that drawing currently goes to.
    fn current_page_info(&self) -> Result<PageInfo>;
    /// Points per document unit.
    fn scale_factor(&self) -> f64;
    /// The document's event bus.
    fn events_mut(&mut self) -> &mut EventBus<Document>;
}

/// A document being authored.
pub struct Document {
    pub(crate) options: DocumentOptions,
    pub(crate) pdf_version: String,
    pub(crate) scale_factor: f64,
    pub(crate) orientation: Orientation,
    pub(crate) default_size: (f64, f64),
    pub(crate) user_unit: f64,
    pub(crate) precision: Option<u32>,
    pub(crate) filters: Vec<String>,
    pub(crate) put_only_used_fonts: bool,

    pub(crate) objects: ObjectTable,
    pub(crate) buffer: Vec<u8>,
    pub(crate) destination: Destination,
    pub(crate) additional_objects: Vec<AdditionalObject>,
    pub(crate) root_dictionary_obj_id: u32,
    pub(crate) resource_dictionary_obj_id: u32,

    pub(crate) pages: Vec<Page>,
    pub(crate) current_page: usize,
    pub(crate) page_x: f64,
    pub(crate) page_y: f64,
    pub(crate) page_matrix: Option<Matrix>,
    pub(crate) render_target_stack: Vec<RenderTarget>,
    pub(crate) form_objects: ResourceRegistry<FormObject>,

    pub(crate) fonts: FontRegistry,
    pub(crate) active_font_key: String,
    pub(crate) active_font_size: f64,
    pub(crate) line_height_factor: f64,
    pub(crate) char_space: Option<f64>,
    pub(crate) r2l: bool,

    pub(crate) gstates: ResourceRegistry<GState>,
    pub(crate) active_gstate: Option<GState>,
    pub(crate) patterns: ResourceRegistry<Pattern>,
    pub(crate) stroke_color: String,
    pub(crate) fill_color: String,
    pub(crate) text_color: String,
    pub(crate) line_width: f64,
    pub(crate) line_cap: LineCapStyle,
    pub(crate) line_join: LineJoinStyle,

    pub(crate) creation_date: String,
    pub(crate) file_id: String,
    pub(crate) properties: DocumentProperties,
    pub(crate) zoom_mode: Option<ZoomMode>,
    pub(crate) layout_mode: LayoutMode,
    pub(crate) page_mode: Option<PageMode>,

    pub(crate) events: EventBus<Document>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("pdf_version", &self.pdf_version)
            .field("pages", &self.pages.len())
            .field("current_page", &self.current_page)
            .field("fonts", &self.fonts.len())
            .field("events", &self.events)
            .finish()
    }
}

fn event_bus(doc: &mut Document) -> &mut EventBus<Document> {
    &mut doc.events
}

impl Document {
    /// Create a document with one page.
    ///
    /// # Errors
    ///
    /// Fails for an unknown filter name in the options, or a NaN page size.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_author::config::DocumentOptions;
    /// use pdf_author::writer::Document;
    ///
    /// let doc = Document::new(DocumentOptions::default()).unwrap();
    /// assert_eq!(doc.page_count(), 1);
    /// ```
    pub fn new(options: DocumentOptions) -> Result<Self> {
        Self::with_plugins(options, &[])
    }

    /// Create a document and install `plugins` before the first page is added.
    pub fn with_plugins(options: DocumentOptions, plugins: &[&dyn Plugin]) -> Result<Self> {
        let filters = options.effective_filters();
        parse_chain(&filters)?;

        let scale_factor = options.unit.scale_factor();
        let default_size = match &options.format {
            PageFormat::Named(name) => paper_size(name).unwrap_or(A4_POINTS),
            PageFormat::Size([w, h]) => (w * scale_factor, h * scale_factor),
        };

        let mut doc = Self {
            pdf_version: DEFAULT_PDF_VERSION.to_string(),
            scale_factor,
            orientation: options.orientation,
            default_size,
            user_unit: options.user_unit,
            precision: options.precision,
            filters,
            put_only_used_fonts: options.put_only_used_fonts,

            objects: ObjectTable::new(),
            buffer: Vec::new(),
            destination: Destination::Page(0),
            additional_objects: Vec::new(),
            root_dictionary_obj_id: 0,
            resource_dictionary_obj_id: 0,

            pages: Vec::new(),
            current_page: 0,
            page_x: 0.0,
            page_y: 0.0,
            page_matrix: None,
            render_target_stack: Vec::new(),
            form_objects: ResourceRegistry::new(),

            fonts: FontRegistry::with_standard_fonts(),
            active_font_key: "F1".to_string(),
            active_font_size: options.font_size,
            line_height_factor: options.line_height_factor,
            char_space: None,
            r2l: false,

            gstates: ResourceRegistry::new(),
            active_gstate: None,
            patterns: ResourceRegistry::new(),
            stroke_color: "0 G".to_string(),
            fill_color: "0 g".to_string(),
            text_color: "0 g".to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            line_cap: LineCapStyle::Butt,
            line_join: LineJoinStyle::Miter,

            creation_date: resolve_creation_date(&CreationDate::Now)?,
            file_id: String::new(),
            properties: DocumentProperties::default(),
            zoom_mode: None,
            layout_mode: LayoutMode::default(),
            page_mode: None,

            events: EventBus::new(),
            options,
        };
        doc.set_file_id(None);

        for plugin in plugins {
            plugin.install(&mut doc)?;
        }

        let format = doc.options.format.clone();
        doc.add_page(Some(format), None)?;

        doc.root_dictionary_obj_id = doc.reserve_object();
        doc.resource_dictionary_obj_id = doc.reserve_object();
        log::debug!(
            "document created: {} pt per {}, filters {:?}",
            doc.scale_factor,
            doc.options.unit,
            doc.filters
        );
        doc.publish(&Event::Initialized);
        Ok(doc)
    }

    /// The options the document was created with.
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    // ---- objects and output routing ----

    /// Reserve the next object number. Nothing is written.
    pub fn reserve_object(&mut self) -> u32 {
        self.objects.reserve(self.buffer.len())
    }

    /// Record that object `id` starts at the current output length, and write its
    /// `<id> 0 obj` line if `emit` is set.
    pub fn begin_object(&mut self, id: u32, emit: bool) {
        self.objects.begin(id, self.buffer.len());
        if emit {
            self.out(format!("{} 0 obj", id));
        }
    }

    /// Reserve an object number and begin the object.
    pub fn new_object(&mut self) -> u32 {
        let id = self.reserve_object();
        self.begin_object(id, true);
        id
    }

    /// Reserve an object that is written, in reservation order, after the page tree.
    pub fn new_additional_object(&mut self) -> u32 {
        let id = self.reserve_object();
        self.additional_objects.push(AdditionalObject {
            id,
            content: Vec::new(),
        });
        id
    }

    /// Set the body of an object from [`Document::new_additional_object`].
    pub fn set_additional_object_content(&mut self, id: u32, content: impl AsRef<[u8]>) -> Result<()> {
        let object = self
            .additional_objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "Invalid argument passed to set_additional_object_content: {} is not an additional object",
                    id
                ))
            })?;
        object.content = content.as_ref().to_vec();
        Ok(())
    }

    /// Write one line to the current destination: the active page's content, or the file
    /// during [`Document::output`].
    pub fn out(&mut self, line: impl AsRef<[u8]>) {
        let line = line.as_ref();
        match self.destination {
            Destination::Document => {
                self.buffer.extend_from_slice(line);
                self.buffer.push(b'\n');
            },
            Destination::Page(n) => match n.checked_sub(1).and_then(|i| self.pages.get_mut(i)) {
                Some(page) => page.content.push(line.to_vec()),
                None => log::debug!("dropping output, page {} does not exist", n),
            },
        }
    }

    /// Write a stream dictionary and its data, filtered as `options` says.
    pub fn put_stream(&mut self, options: &StreamOptions) -> Result<()> {
        let lines = encode_stream(options, &self.filters)?;
        for line in lines {
            self.out(line);
        }
        Ok(())
    }

    /// Bytes written to the file so far.
    pub fn content_length(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn reset_document(&mut self) {
        self.objects.reset();
        self.buffer.clear();
        self.additional_objects.clear();
        self.root_dictionary_obj_id = self.reserve_object();
        self.resource_dictionary_obj_id = self.reserve_object();
    }

    /// The document filter chain.
    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    // ---- events ----

    /// Subscribe to a lifecycle topic. Subscribers get the document itself.
    pub fn subscribe<F>(&mut self, topic: Topic, callback: F, once: bool) -> Result<SubscriptionToken>
    where
        F: FnMut(&mut Document, &Event) -> SubscriberResult + 'static,
    {
        self.events.subscribe(topic, callback, once)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.events.unsubscribe(token)
    }

    /// Deliver `event` to its subscribers.
    pub fn publish(&mut self, event: &Event) {
        publish_within(self, event_bus, event);
    }

    // ---- units ----

    /// Points per document unit.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub(crate) fn scale(&self, value: f64) -> f64 {
        value * self.scale_factor
    }

    /// Height of the current page in points.
    pub(crate) fn current_page_height_pt(&self) -> f64 {
        self.page(self.current_page)
            .map(|p| p.context.media_box.height())
            .unwrap_or(0.0)
    }

    /// `y` in document units from the top, as points from the bottom of the current page.
    pub(crate) fn vertical_coordinate(&self, y: f64) -> f64 {
        self.current_page_height_pt() - self.scale(y)
    }

    // ---- pages ----

    pub(crate) fn page(&self, n: usize) -> Option<&Page> {
        n.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    pub(crate) fn page_mut(&mut self, n: usize) -> Result<&mut Page> {
        let count = self.pages.len();
        n.checked_sub(1)
            .and_then(|i| self.pages.get_mut(i))
            .ok_or_else(|| Error::InvalidPage(format!("page {} does not exist ({} pages)", n, count)))
    }

    /// Append a page and make it current.
    ///
    /// `None` uses the document format and orientation. The persistent line width, stroke
    /// color and non-default cap/join are written at the top of the new page.
    pub fn add_page(&mut self, format: Option<PageFormat>, orientation: Option<Orientation>) -> Result<()> {
        let format = format.unwrap_or_else(|| self.options.format.clone());
        let orientation = orientation.unwrap_or(self.orientation);
        let (width, height) = page_dimensions(&format, orientation, self.scale_factor, self.default_size)?;
        self.push_page(width, height);

        let width_line = format!("{} w", crate::number::f2(self.scale(self.line_width))?);
        self.out(width_line);
        let stroke = self.stroke_color.clone();
        self.out(stroke);
        if self.line_cap != LineCapStyle::Butt {
            self.out(format!("{} J", self.line_cap.id()));
        }
        if self.line_join != LineJoinStyle::Miter {
            self.out(format!("{} j", self.line_join.id()));
        }

        let page_number = self.pages.len();
        log::debug!("added page {} ({} x {} pt)", page_number, width, height);
        self.publish(&Event::AddPage { page_number });
        Ok(())
    }

    pub(crate) fn push_page(&mut self, width: f64, height: f64) {
        self.pages.push(Page::new(width, height, self.user_unit));
        self.set_page(self.pages.len());
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 1-based number of the page drawing goes to.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Make page `n` current. Out-of-range numbers are ignored, unlike
    /// [`Document::page_info`] which rejects them.
    pub fn set_page(&mut self, n: usize) {
        if n > 0 && n <= self.pages.len() {
            self.current_page = n;
        }
        self.destination = Destination::Page(self.current_page);
    }

    /// Add a page and move it before page `before`.
    pub fn insert_page(&mut self, before: usize) -> Result<()> {
        self.add_page(None, None)?;
        self.move_page(self.current_page, before);
        Ok(())
    }

    /// Move page `target` to position `before`, shifting the pages in between by one.
    /// The moved page becomes current. Out-of-range numbers are ignored.
    pub fn move_page(&mut self, target: usize, before: usize) {
        let count = self.pages.len();
        if target == before || target == 0 || before == 0 || target > count || before > count {
            return;
        }
        let page = self.pages.remove(target - 1);
        self.pages.insert(before - 1, page);
        self.set_page(before);
    }

    /// Remove page `n`. Out-of-range numbers are ignored; if the current page no longer
    /// exists the last page becomes current.
    pub fn delete_page(&mut self, n: usize) {
        if n == 0 || n > self.pages.len() {
            return;
        }
        self.pages.remove(n - 1);
        if self.current_page > self.pages.len() {
            self.current_page = self.pages.len();
        }
        self.set_page(self.current_page);
    }

    /// Width of page `n` in document units.
    pub fn page_width(&self, n: usize) -> Result<f64> {
        self.page(n)
            .map(|p| p.context.media_box.width() / self.scale_factor)
            .ok_or_else(|| Error::InvalidPage(format!("page {} does not exist", n)))
    }

    /// Height of page `n` in document units.
    pub fn page_height(&self, n: usize) -> Result<f64> {
        self.page(n)
            .map(|p| p.context.media_box.height() / self.scale_factor)
            .ok_or_else(|| Error::InvalidPage(format!("page {} does not exist", n)))
    }

    /// Set the width of page `n` in document units.
    pub fn set_page_width(&mut self, n: usize, width: f64) -> Result<()> {
        let k = self.scale_factor;
        let media = &mut self.page_mut(n)?.context.media_box;
        media.top_right_x = width * k + media.bottom_left_x;
        Ok(())
    }

    /// Set the height of page `n` in document units.
    pub fn set_page_height(&mut self, n: usize, height: f64) -> Result<()> {
        let k = self.scale_factor;
        let media = &mut self.page_mut(n)?.context.media_box;
        media.top_right_y = height * k + media.bottom_left_y;
        Ok(())
    }

    /// Page `n` with its context. Object numbers are those of the last output.
    pub fn page_info(&self, n: usize) -> Result<PageInfo> {
        let page = self.page(n).ok_or_else(|| {
            Error::InvalidPage(format!(
                "Invalid argument passed to page_info: {} (document has {} pages)",
                n,
                self.pages.len()
            ))
        })?;
        Ok(PageInfo {
            obj_id: page.context.obj_id,
            page_number: n,
            context: page.context.clone(),
        })
    }

    /// The page whose dictionary was written as object `obj_id` by the last output.
    pub fn page_info_by_obj_id(&self, obj_id: u32) -> Result<Option<PageInfo>> {
        if obj_id == 0 {
            return Err(Error::invalid_argument(
                "Invalid argument passed to page_info_by_obj_id: 0 is not an object number",
            ));
        }
        match self.pages.iter().position(|p| p.context.obj_id == obj_id) {
            Some(index) => self.page_info(index + 1).map(Some),
            None => Ok(None),
        }
    }

    /// The current page with its context.
    pub fn current_page_info(&self) -> Result<PageInfo> {
        self.page_info(self.current_page)
    }

    /// Set or clear a Crop/Bleed/Trim/Art box of page `n`, in points.
    pub fn set_page_box(&mut self, n: usize, kind: PageBoxKind, value: Option<PageBox>) -> Result<()> {
        self.page_mut(n)?.context.set_page_box(kind, value);
        Ok(())
    }

    /// Add an annotation object to page `n`'s `/Annots` array.
    pub fn add_page_annotation(&mut self, n: usize, obj_id: u32) -> Result<()> {
        self.page_mut(n)?.context.annotations.push(obj_id);
        Ok(())
    }

    // ---- document metadata ----

    /// Header version, e.g. `1.3`.
    pub fn pdf_version(&self) -> &str {
        &self.pdf_version
    }

    /// Set the header version.
    pub fn set_pdf_version(&mut self, version: impl Into<String>) {
        self.pdf_version = version.into();
    }

    /// Set the creation date and return it as a `D:` string.
    pub fn set_creation_date(&mut self, date: CreationDate) -> Result<&str> {
        self.creation_date = resolve_creation_date(&date)?;
        Ok(&self.creation_date)
    }

    /// The creation date as a `D:` string.
    pub fn creation_date(&self) -> &str {
        &self.creation_date
    }

    /// The creation date as local date-time (the offset is dropped).
    pub fn creation_date_as_datetime(&self) -> Result<NaiveDateTime> {
        parse_pdf_date(&self.creation_date)
    }

    /// Set the file id. A 32-digit hex value is upper-cased; anything else, including
    /// `None`, generates a random id.
    pub fn set_file_id(&mut self, value: Option<&str>) -> &str {
        self.file_id = match value {
            Some(v) if v.len() == 32 && v.chars().all(|c| c.is_ascii_hexdigit()) => v.to_uppercase(),
            _ => uuid::Uuid::new_v4().simple().to_string().to_uppercase(),
        };
        &self.file_id
    }

    /// The 32-digit file id written to the trailer.
    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// Copy the non-empty values of `properties`.
    pub fn set_document_properties(&mut self, properties: &DocumentProperties) {
        for key in DocumentProperties::KEYS {
            if let (Some(value), Some(target)) = (properties.field(key), self.properties.field_mut(key)) {
                if !value.is_empty() {
                    *target = value.clone();
                }
            }
        }
    }

    /// The info dictionary properties.
    pub fn document_properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// Set one property by name (`title`, `subject`, `author`, `keywords`, `creator`).
    pub fn set_document_property(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let target = self.properties.field_mut(key).ok_or_else(|| {
            Error::invalid_argument(format!(
                "Invalid arguments passed to set_document_property: unknown property '{}'",
                key
            ))
        })?;
        *target = value.into();
        Ok(())
    }

    /// One property by name.
    pub fn get_document_property(&self, key: &str) -> Result<&str> {
        self.properties.field(key).map(String::as_str).ok_or_else(|| {
            Error::invalid_argument(format!(
                "Invalid argument passed to get_document_property: unknown property '{}'",
                key
            ))
        })
    }

    /// Set viewer preferences. `None` keeps the current value of that setting.
    pub fn set_display_mode(
        &mut self,
        zoom: Option<ZoomMode>,
        layout: Option<LayoutMode>,
        page_mode: Option<PageMode>,
    ) {
        if zoom.is_some() {
            self.zoom_mode = zoom;
        }
        if let Some(layout) = layout {
            self.layout_mode = layout;
        }
        if page_mode.is_some() {
            self.page_mode = page_mode;
        }
    }

    /// Initial zoom, if set.
    pub fn zoom_mode(&self) -> Option<ZoomMode> {
        self.zoom_mode
    }

    /// Page layout.
    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    /// Page mode, if set.
    pub fn page_mode(&self) -> Option<PageMode> {
        self.page_mode
    }

    /// Decimals used when writing matrices.
    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    /// Set the decimals used when writing matrices.
    pub fn set_precision(&mut self, precision: u32) {
        self.precision = Some(precision);
    }

    /// Set the line height as a multiple of the font size.
    pub fn set_line_height_factor(&mut self, factor: f64) {
        self.line_height_factor = factor;
    }

    /// Line height as a multiple of the font size.
    pub fn line_height_factor(&self) -> f64 {
        self.line_height_factor
    }

    /// Line height in points for the active font size.
    pub fn line_height(&self) -> f64 {
        self.active_font_size * self.line_height_factor
    }

    /// Write a `%` comment line into the current content.
    pub fn comment(&mut self, text: &str) {
        self.out(format!("%{}", text));
    }
}

impl DocumentCore for Document {
    fn reserve_object(&mut self) -> u32 {
        Document::reserve_object(self)
    }

    fn begin_object(&mut self, id: u32, emit: bool) {
        Document::begin_object(self, id, emit)
    }

    fn new_object(&mut self) -> u32 {
        Document::new_object(self)
    }

    fn new_additional_object(&mut self) -> u32 {
        Document::new_additional_object(self)
    }

    fn set_additional_object_content(&mut self, id: u32, content: &[u8]) -> Result<()> {
        Document::set_additional_object_content(self, id, content)
    }

    fn out(&mut self, line: &[u8]) {
        Document::out(self, line)
    }

    fn put_stream(&mut self, options: &StreamOptions) -> Result<()> {
        Document::put_stream(self, options)
    }

    fn current_page_info(&self) -> Result<PageInfo> {
        Document::current_page_info(self)
    }

    fn scale_factor(&self) -> f64 {
        Document::scale_factor(self)
    }

    fn events_mut(&mut self) -> &mut EventBus<Document> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Unit;

    fn doc() -> Document {
        Document::new(DocumentOptions::default()).unwrap()
    }

    fn page_lines(doc: &Document, n: usize) -> Vec<String> {
        doc.page(n)
            .unwrap()
            .content
            .iter()
            .map(|l| String::from_utf8_lossy(l).into_owned())
            .collect()
    }

    #[test]
    fn test_new_document_state() {
        let doc = doc();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.current_page(), 1);
        assert_eq!(doc.pdf_version(), "1.3");
        assert_eq!(doc.file_id().len(), 32);
        assert!(crate::date::is_valid_pdf_date(doc.creation_date()));
        assert_eq!((doc.root_dictionary_obj_id, doc.resource_dictionary_obj_id), (1, 2));
    }

    #[test]
    fn test_first_page_carries_graphics_state() {
        let doc = doc();
        assert_eq!(page_lines(&doc, 1), vec!["0.57 w", "0 G"]);
    }

    #[test]
    fn test_unknown_filter_rejected_at_construction() {
        let options = DocumentOptions::default().with_filters(["BogusEncode"]);
        let err = Document::new(options).unwrap_err();
        assert_eq!(err.to_string(), "The filter: \"BogusEncode\" is not implemented");
    }

    #[test]
    fn test_set_page_ignores_out_of_range() {
        let mut doc = doc();
        doc.add_page(None, None).unwrap();
        doc.set_page(1);
        doc.set_page(9);
        assert_eq!(doc.current_page(), 1);
        assert!(doc.page_info(9).is_err());
    }

    #[test]
    fn test_move_page_rotates() {
        let mut doc = doc();
        for _ in 0..3 {
            doc.add_page(None, None).unwrap();
        }
        for n in 1..=4 {
            doc.set_page(n);
            doc.comment(&n.to_string());
        }
        doc.move_page(4, 1);
        let order: Vec<String> = (1..=4).map(|n| page_lines(&doc, n).last().unwrap().clone()).collect();
        assert_eq!(order, vec!["%4", "%1", "%2", "%3"]);
        assert_eq!(doc.current_page(), 1);
    }

    #[test]
    fn test_delete_page_clamps_current() {
        let mut doc = doc();
        doc.add_page(None, None).unwrap();
        doc.delete_page(2);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.current_page(), 1);
        doc.delete_page(5);
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_page_size_accessors() {
        let mut doc = Document::new(DocumentOptions::default().with_unit(Unit::Pt)).unwrap();
        assert!((doc.page_width(1).unwrap() - 595.28).abs() < 1e-9);
        doc.set_page_height(1, 500.0).unwrap();
        assert_eq!(doc.page_height(1).unwrap(), 500.0);
        assert!(doc.set_page_width(3, 1.0).is_err());
    }

    #[test]
    fn test_file_id() {
        let mut doc = doc();
        assert_eq!(
            doc.set_file_id(Some("0123456789abcdef0123456789abcdef")),
            "0123456789ABCDEF0123456789ABCDEF"
        );
        let random = doc.set_file_id(Some("xyz")).to_string();
        assert_eq!(random.len(), 32);
        assert!(random.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_document_properties() {
        let mut doc = doc();
        doc.set_document_properties(&DocumentProperties {
            title: "Report".into(),
            ..Default::default()
        });
        doc.set_document_property("author", "Ada").unwrap();
        assert_eq!(doc.get_document_property("title").unwrap(), "Report");
        assert_eq!(doc.document_properties().entries(), vec![("title", "Report"), ("author", "Ada")]);
        assert!(doc.get_document_property("producer").is_err());
        assert!(doc.set_document_property("producer", "x").is_err());
    }

    #[test]
    fn test_additional_objects() {
        let mut doc = doc();
        let id = doc.new_additional_object();
        assert_eq!(id, 3);
        doc.set_additional_object_content(id, "<< >>").unwrap();
        assert!(doc.set_additional_object_content(99, "x").is_err());
    }

    #[test]
    fn test_page_info_by_obj_id_rejects_zero() {
        let doc = doc();
        assert!(doc.page_info_by_obj_id(0).is_err());
        assert_eq!(doc.page_info_by_obj_id(3).unwrap(), None);
    }

    #[test]
    fn test_page_boxes_and_annotations() {
        let mut doc = doc();
        doc.set_page_box(1, PageBoxKind::Trim, Some(PageBox::new(100.0, 100.0))).unwrap();
        doc.add_page_annotation(1, 42).unwrap();
        let info = doc.page_info(1).unwrap();
        assert_eq!(info.context.page_box(PageBoxKind::Trim), Some(PageBox::new(100.0, 100.0)));
        assert_eq!(info.context.annotations, vec![42]);
    }

    struct CountPages;

    impl Plugin for CountPages {
        fn install(&self, doc: &mut Document) -> Result<()> {
            doc.subscribe(
                Topic::AddPage,
                |doc: &mut Document, event: &Event| {
                    if let Event::AddPage { page_number } = event {
                        doc.comment(&format!("page {}", page_number));
                    }
                    Ok(())
                },
                false,
            )?;
            Ok(())
        }
    }

    #[test]
    fn test_plugin_sees_first_page() {
        let doc = Document::with_plugins(DocumentOptions::default(), &[&CountPages]).unwrap();
        assert_eq!(page_lines(&doc, 1).last().unwrap(), "%page 1");
    }
}
