//! The editing session.
//!
//! [`EditorSession`] owns the canvas and routes every user action through the
//! geometry engine, the property panel, history and persistence. It is
//! driven from a single event loop: pointer, keyboard and panel events are
//! handled one at a time, and async operations (load, save, media, export)
//! are awaited by the caller before the next event is dispatched.

mod gesture;
mod shortcuts;

pub use gesture::{Gesture, GestureKind};
pub use shortcuts::{EditorCommand, Modifiers, Shortcut, ShortcutRegistry};

use crate::canvas::Canvas;
use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, ShapeType, StyleValue};
use crate::export::{ExportArtifact, ExportError, ExportFormat, ExportService, JsonExporter};
use crate::geometry::{Geometry, Guide, HANDLE_HIT_TOLERANCE, Handle, HandleKind, alignment_guides, handles_for, hit_test_handles};
use crate::history::HistoryLog;
use crate::media::{AcquiredImage, CompressingImageSource, ImageSource, MediaError, MediaFile};
use crate::schema::{BindingOutcome, ControlError, ControlInput, ControlPanel, PanelView, Tab, hydrate_defaults};
use crate::storage::{AutoSaveManager, KeyValueStore, MemoryStorage, PersistenceError};
use crate::templates::{Favorites, Template, TemplateLibrary};
use kurbo::Point;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Default size of elements added from the toolbar.
const NEW_TEXT_SIZE: (f64, f64) = (300.0, 60.0);
const NEW_BLOCK_SIZE: (f64, f64) = (200.0, 200.0);

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no element is selected")]
    NoSelection,
    #[error("element {0} not found")]
    ElementNotFound(ElementId),
    #[error("template '{0}' not found")]
    TemplateNotFound(String),
    #[error("a pointer gesture is in progress")]
    GestureInProgress,
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// A non-fatal problem to show the user as a dismissable notice.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorWarning {
    /// The stored design could not be restored; editing started from scratch.
    LoadFailed(String),
    /// An auto-save failed; the design is still dirty and will be retried.
    SaveFailed(String),
}

impl EditorWarning {
    pub fn message(&self) -> String {
        match self {
            EditorWarning::LoadFailed(reason) => format!("Could not restore your last design: {reason}"),
            EditorWarning::SaveFailed(reason) => format!("Could not save your design: {reason}"),
        }
    }
}

/// Which surfaces need redrawing since the last time the host asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderRequest {
    pub canvas: bool,
    pub panel: bool,
    pub handles: bool,
}

impl RenderRequest {
    pub fn is_empty(&self) -> bool {
        !(self.canvas || self.panel || self.handles)
    }

    fn everything(&mut self) {
        *self = RenderRequest {
            canvas: true,
            panel: true,
            handles: true,
        };
    }
}

/// A text-bearing element listed in the quick-edit sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickEditField {
    pub element: ElementId,
    pub kind: ElementKind,
    pub text: String,
    pub visible: bool,
}

/// Services the session delegates to.
pub struct Collaborators {
    pub store: Arc<dyn KeyValueStore>,
    pub images: Arc<dyn ImageSource>,
    pub exporter: Arc<dyn ExportService>,
    pub templates: Arc<TemplateLibrary>,
}

impl Collaborators {
    /// In-memory storage, JPEG-compressing media, JSON export and the
    /// built-in templates.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStorage::new()),
            images: Arc::new(CompressingImageSource::default()),
            exporter: Arc::new(JsonExporter),
            templates: Arc::new(TemplateLibrary::builtin()),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_images(mut self, images: Arc<dyn ImageSource>) -> Self {
        self.images = images;
        self
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn ExportService>) -> Self {
        self.exporter = exporter;
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// One user's editing session over one canvas.
pub struct EditorSession {
    config: EditorConfig,
    canvas: Canvas,
    history: HistoryLog,
    selection: Option<ElementId>,
    gesture: Option<Gesture>,
    guides: Vec<Guide>,
    panel: ControlPanel,
    autosave: AutoSaveManager,
    images: Arc<dyn ImageSource>,
    exporter: Arc<dyn ExportService>,
    templates: Arc<TemplateLibrary>,
    current_template: Option<String>,
    favorites: Favorites,
    zoom: f64,
    loading: bool,
    render: RenderRequest,
    warnings: Vec<EditorWarning>,
}

impl EditorSession {
    /// Create a session with an empty canvas. Call [`start`](Self::start) to
    /// restore the stored design.
    pub fn new(config: EditorConfig, collaborators: Collaborators) -> Self {
        let config = config.normalized();
        let zoom = 1.0_f64.clamp(config.min_zoom, config.max_zoom);
        let canvas = Canvas::new(config.canvas_width, config.canvas_height);
        let mut history = HistoryLog::new(config.history_capacity);
        history.reset(&canvas);

        let mut autosave = AutoSaveManager::new(collaborators.store).with_key(config.design_key.clone());
        autosave.set_interval(config.autosave_interval());

        Self {
            config,
            canvas,
            history,
            selection: None,
            gesture: None,
            guides: Vec::new(),
            panel: ControlPanel::new(),
            autosave,
            images: collaborators.images,
            exporter: collaborators.exporter,
            templates: collaborators.templates,
            current_template: None,
            favorites: Favorites::new(),
            zoom,
            loading: false,
            render: RenderRequest::default(),
            warnings: Vec::new(),
        }
    }

    /// Restore the stored design, or start empty.
    ///
    /// A corrupt record never aborts startup: the session falls back to an
    /// empty canvas and queues a [`EditorWarning::LoadFailed`].
    pub async fn start(&mut self) {
        self.loading = true;
        match self.autosave.load().await {
            Ok(Some(canvas)) => {
                log::info!("Restored saved design with {} elements", canvas.len());
                self.canvas = canvas;
            }
            Ok(None) => {
                log::info!("No saved design, starting with an empty canvas");
            }
            Err(e) => {
                log::warn!("Failed to restore saved design: {}", e);
                self.warnings.push(EditorWarning::LoadFailed(e.to_string()));
                self.canvas = Canvas::new(self.config.canvas_width, self.config.canvas_height);
            }
        }

        self.favorites = match Favorites::load(self.autosave.storage().as_ref()).await {
            Ok(favorites) => favorites,
            Err(e) => {
                log::warn!("Failed to restore favourite templates: {}", e);
                self.warnings.push(EditorWarning::LoadFailed(e.to_string()));
                Favorites::new()
            }
        };

        self.selection = None;
        self.gesture = None;
        self.guides.clear();
        self.history.reset(&self.canvas);
        self.loading = false;
        self.render.everything();
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether there are changes not yet written to storage.
    pub fn is_dirty(&self) -> bool {
        self.autosave.is_dirty()
    }

    /// True while an async operation (load, media, export) is running.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Alignment guides for the drag in progress.
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn templates(&self) -> &TemplateLibrary {
        &self.templates
    }

    /// Id of the template the canvas was last built from.
    pub fn current_template(&self) -> Option<&str> {
        self.current_template.as_deref()
    }

    /// Take the pending redraw flags.
    pub fn take_render_request(&mut self) -> RenderRequest {
        std::mem::take(&mut self.render)
    }

    /// Take the warnings queued since the last call.
    pub fn take_warnings(&mut self) -> Vec<EditorWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Record the current canvas as a history step.
    ///
    /// Call after a discrete change (a panel `change` event, a quick-edit
    /// blur). Returns false when nothing changed since the last step.
    pub fn commit(&mut self) -> bool {
        let committed = self.history.push(&self.canvas);
        if committed {
            self.autosave.mark_dirty();
        }
        committed
    }

    // --- selection ---

    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.and_then(|id| self.canvas.get(id))
    }

    pub fn select(&mut self, id: ElementId) -> Result<(), EditorError> {
        if !self.canvas.contains(id) {
            return Err(EditorError::ElementNotFound(id));
        }
        self.selection = Some(id);
        self.render.panel = true;
        self.render.handles = true;
        Ok(())
    }

    pub fn deselect(&mut self) {
        if self.selection.take().is_some() {
            self.render.panel = true;
            self.render.handles = true;
        }
    }

    /// Handles around the selected element, for drawing.
    pub fn handles(&self) -> Vec<Handle> {
        self.selected_element()
            .map(|e| handles_for(&e.geometry))
            .unwrap_or_default()
    }

    // --- adding and removing elements ---

    /// Add an element on top, select it and record the step.
    ///
    /// Unset style attributes are filled from the element's control schema.
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        hydrate_defaults(&mut element);
        let id = self.canvas.add_element(element);
        self.selection = Some(id);
        self.commit();
        self.render.everything();
        log::debug!("Added element {}", id);
        id
    }

    pub fn add_heading(&mut self, origin: Point) -> ElementId {
        let (w, h) = NEW_TEXT_SIZE;
        self.add_element(Element::heading(Geometry::new(origin.x, origin.y, w, h), "New Title"))
    }

    pub fn add_text(&mut self, origin: Point) -> ElementId {
        let (w, h) = NEW_TEXT_SIZE;
        self.add_element(Element::text(Geometry::new(origin.x, origin.y, w, h), "Enter text..."))
    }

    pub fn add_shape(&mut self, shape_type: ShapeType, origin: Point) -> ElementId {
        let (w, h) = NEW_BLOCK_SIZE;
        self.add_element(Element::shape(Geometry::new(origin.x, origin.y, w, h), shape_type))
    }

    /// Acquire an image file and add it as a new element.
    pub async fn add_image(&mut self, file: MediaFile, origin: Point) -> Result<ElementId, EditorError> {
        let acquired = self.acquire_media(file).await?;
        let (w, h) = NEW_BLOCK_SIZE;
        let element = Element::image(Geometry::new(origin.x, origin.y, w, h), acquired.reference);
        Ok(self.add_element(element))
    }

    /// Remove the selected element.
    pub fn delete_selected(&mut self) -> Result<Element, EditorError> {
        if self.gesture.is_some() {
            return Err(EditorError::GestureInProgress);
        }
        let id = self.selection.ok_or(EditorError::NoSelection)?;
        let removed = self
            .canvas
            .remove_element(id)
            .ok_or(EditorError::ElementNotFound(id))?;
        self.selection = None;
        self.commit();
        self.render.everything();
        Ok(removed)
    }

    // --- stacking ---

    pub fn bring_to_front(&mut self) -> Result<bool, EditorError> {
        self.restack(Canvas::bring_to_front)
    }

    pub fn send_to_back(&mut self) -> Result<bool, EditorError> {
        self.restack(Canvas::send_to_back)
    }

    pub fn bring_forward(&mut self) -> Result<bool, EditorError> {
        self.restack(Canvas::bring_forward)
    }

    pub fn send_backward(&mut self) -> Result<bool, EditorError> {
        self.restack(Canvas::send_backward)
    }

    fn restack(&mut self, op: fn(&mut Canvas, ElementId) -> bool) -> Result<bool, EditorError> {
        let id = self.selection.ok_or(EditorError::NoSelection)?;
        let moved = op(&mut self.canvas, id);
        if moved {
            self.commit();
            self.render.canvas = true;
        }
        Ok(moved)
    }

    // --- pointer gestures ---

    /// Start a gesture.
    ///
    /// A press on a handle of the selected element starts a resize or rotate;
    /// a press on an element selects it and starts a drag; a press on empty
    /// canvas clears the selection.
    pub fn pointer_down(&mut self, point: Point) -> Option<GestureKind> {
        if self.gesture.is_some() {
            log::debug!("Ignoring pointer down during an active gesture");
            return None;
        }

        let tolerance = HANDLE_HIT_TOLERANCE / self.zoom;
        let handle_hit = self.selected_element().and_then(|e| {
            hit_test_handles(&e.geometry, point, tolerance).map(|handle| (e.id, e.geometry, handle))
        });

        if let Some((id, geometry, handle)) = handle_hit {
            let kind = match handle {
                HandleKind::Resize(corner) => GestureKind::Resize(corner),
                HandleKind::Rotate => GestureKind::Rotate,
            };
            self.gesture = Some(Gesture::new(id, kind, point, geometry));
            return Some(kind);
        }

        let hit = self
            .canvas
            .element_at_point(point)
            .and_then(|id| self.canvas.get(id).map(|e| (id, e.geometry)));

        match hit {
            Some((id, geometry)) => {
                self.selection = Some(id);
                self.gesture = Some(Gesture::new(id, GestureKind::Drag, point, geometry));
                self.render.panel = true;
                self.render.handles = true;
                Some(GestureKind::Drag)
            }
            None => {
                self.deselect();
                None
            }
        }
    }

    /// Update the element under gesture. Returns false when no gesture is active.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        gesture.current_pointer = point;
        let geometry = gesture.apply(self.config.snap_unit);
        let (id, kind) = (gesture.element, gesture.kind);

        let Some(element) = self.canvas.get_mut(id) else {
            log::warn!("Element {} vanished during a gesture", id);
            self.gesture = None;
            self.guides.clear();
            return false;
        };
        element.geometry = geometry;

        self.guides = if kind == GestureKind::Drag {
            alignment_guides(geometry.bounds(), self.canvas.bounds_except(id), self.config.guide_threshold)
        } else {
            Vec::new()
        };

        self.render.canvas = true;
        self.render.handles = true;
        true
    }

    /// Finish the gesture and record exactly one history step for it.
    ///
    /// Returns true if the gesture changed the canvas.
    pub fn pointer_up(&mut self, point: Point) -> bool {
        if self.gesture.is_none() {
            return false;
        }
        self.pointer_move(point);
        self.gesture = None;
        self.guides.clear();
        self.render.panel = true;
        self.commit()
    }

    // --- history ---

    pub fn undo(&mut self) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.canvas = snapshot.clone();
        log::debug!("Undo");
        self.after_restore();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.canvas = snapshot.clone();
        log::debug!("Redo");
        self.after_restore();
        true
    }

    fn after_restore(&mut self) {
        if let Some(id) = self.selection {
            if !self.canvas.contains(id) {
                self.selection = None;
            }
        }
        self.autosave.mark_dirty();
        self.render.everything();
    }

    // --- property panel ---

    /// Panel for the selected element on the active tab.
    pub fn panel_view(&self) -> Option<PanelView> {
        self.selected_element().map(|e| self.panel.render(e))
    }

    pub fn panel_tab(&self) -> Tab {
        self.panel.tab()
    }

    pub fn set_panel_tab(&mut self, tab: Tab) {
        self.panel.set_tab(tab);
        self.render.panel = true;
    }

    pub fn set_control_search(&mut self, term: &str) {
        self.panel.set_search(term);
        self.render.panel = true;
    }

    /// Live edit (`input` event): written through immediately, not recorded.
    pub fn control_input(
        &mut self,
        control_id: &str,
        input: impl Into<ControlInput>,
    ) -> Result<BindingOutcome, EditorError> {
        let id = self.selection.ok_or(EditorError::NoSelection)?;
        let outcome = self.panel.apply(&mut self.canvas, id, control_id, input.into())?;
        self.render.canvas = true;
        self.render.handles = true;
        if outcome.rerender_panel {
            self.render.panel = true;
        }
        Ok(outcome)
    }

    /// Committed edit (`change` event): written and recorded as a step.
    pub fn control_change(
        &mut self,
        control_id: &str,
        input: impl Into<ControlInput>,
    ) -> Result<BindingOutcome, EditorError> {
        let outcome = self.control_input(control_id, input)?;
        self.commit();
        Ok(outcome)
    }

    /// Restore a control's default, record the step and rebuild the panel.
    pub fn control_reset(&mut self, control_id: &str) -> Result<BindingOutcome, EditorError> {
        let id = self.selection.ok_or(EditorError::NoSelection)?;
        let outcome = self.panel.reset(&mut self.canvas, id, control_id)?;
        self.commit();
        self.render.everything();
        Ok(outcome)
    }

    /// Acquire an image for a media-picker control of the selected element.
    pub async fn pick_media(&mut self, control_id: &str, file: MediaFile) -> Result<AcquiredImage, EditorError> {
        let id = self.selection.ok_or(EditorError::NoSelection)?;
        let acquired = self.acquire_media(file).await?;
        let value = StyleValue::text(acquired.reference.as_str());
        self.panel.apply(&mut self.canvas, id, control_id, ControlInput::Value(value))?;
        self.commit();
        self.render.everything();
        Ok(acquired)
    }

    async fn acquire_media(&mut self, file: MediaFile) -> Result<AcquiredImage, EditorError> {
        let images = Arc::clone(&self.images);
        let name = file.name.clone();
        self.loading = true;
        let result = images.acquire(file).await;
        self.loading = false;

        match result {
            Ok(acquired) => {
                log::info!("Acquired image {} (compressed: {})", name, acquired.compressed);
                Ok(acquired)
            }
            Err(e) => {
                log::error!("Failed to acquire image {}: {}", name, e);
                Err(e.into())
            }
        }
    }

    // --- quick edit ---

    /// Text-bearing elements in stacking order.
    pub fn quick_edit_fields(&self) -> Vec<QuickEditField> {
        self.canvas
            .elements
            .iter()
            .filter(|e| e.kind.is_text_bearing())
            .filter_map(|e| {
                e.text_content().map(|text| QuickEditField {
                    element: e.id,
                    kind: e.kind.clone(),
                    text: text.to_string(),
                    visible: e.is_visible(),
                })
            })
            .collect()
    }

    /// Write text from the quick-edit sidebar. Call [`commit`](Self::commit)
    /// when the field loses focus.
    pub fn quick_edit(&mut self, id: ElementId, text: &str) -> Result<(), EditorError> {
        let element = self.canvas.get_mut(id).ok_or(EditorError::ElementNotFound(id))?;
        if !element.kind.is_text_bearing() {
            return Err(ControlError::UnknownControl {
                control: "text".to_string(),
                kind: element.kind.to_string(),
            }
            .into());
        }
        element.set_text(text);
        self.render.canvas = true;
        if self.selection == Some(id) {
            self.render.panel = true;
        }
        Ok(())
    }

    /// Show or hide an element. Hiding the selected element deselects it.
    ///
    /// Returns false when the element already had that visibility.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<bool, EditorError> {
        if self.gesture.is_some() {
            return Err(EditorError::GestureInProgress);
        }
        let element = self.canvas.get_mut(id).ok_or(EditorError::ElementNotFound(id))?;
        if element.is_visible() == visible {
            return Ok(false);
        }
        element.set_visible(visible);
        if !visible && self.selection == Some(id) {
            self.deselect();
        }
        self.commit();
        self.render.canvas = true;
        Ok(true)
    }

    // --- templates ---

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Templates in a category, where `"favorites"` lists the favourites.
    pub fn templates_in(&self, category: &str) -> Vec<&Template> {
        self.templates.in_category(category, &self.favorites)
    }

    /// Mark or unmark a template as favourite and store the list.
    ///
    /// Returns true if the template is now a favourite. A failed write leaves
    /// the in-memory list toggled.
    pub async fn toggle_favorite(&mut self, template_id: &str) -> Result<bool, EditorError> {
        if self.templates.get(template_id).is_none() {
            return Err(EditorError::TemplateNotFound(template_id.to_string()));
        }
        let favorite = self.favorites.toggle(template_id);
        let store = Arc::clone(self.autosave.storage());
        self.favorites.save(store.as_ref()).await?;
        log::debug!("Template {} favourite: {}", template_id, favorite);
        Ok(favorite)
    }

    /// Replace the canvas with a fresh instance of a template.
    ///
    /// Replacing a non-empty canvas needs `confirmed`; without it nothing
    /// happens and `Ok(false)` is returned. The replacement is a history step,
    /// so it can be undone.
    pub fn apply_template(&mut self, template_id: &str, confirmed: bool) -> Result<bool, EditorError> {
        if self.gesture.is_some() {
            return Err(EditorError::GestureInProgress);
        }
        let template: &Template = self
            .templates
            .get(template_id)
            .ok_or_else(|| EditorError::TemplateNotFound(template_id.to_string()))?;

        if !confirmed && !self.canvas.is_empty() {
            log::debug!("Template {} needs confirmation before replacing the canvas", template_id);
            return Ok(false);
        }

        let canvas = template.instantiate(self.canvas.width, self.canvas.height);
        log::info!("Applied template {} ({})", template.id, template.name);

        self.canvas = canvas;
        self.selection = None;
        self.current_template = Some(template_id.to_string());
        self.commit();
        self.render.everything();
        Ok(true)
    }

    // --- persistence ---

    /// Write the design now if it has unsaved changes.
    pub async fn save_now(&mut self) -> Result<bool, EditorError> {
        let saved = self.autosave.save(&self.canvas).await?;
        if saved {
            log::info!("Saved design");
        }
        Ok(saved)
    }

    /// Timer hook: save if dirty and the interval has passed.
    ///
    /// Failures are queued as warnings and the design stays dirty.
    pub async fn autosave_tick(&mut self, now: Instant) -> bool {
        match self.autosave.maybe_save(&self.canvas, now).await {
            Ok(saved) => saved,
            Err(e) => {
                log::warn!("Auto-save failed: {}", e);
                self.warnings.push(EditorWarning::SaveFailed(e.to_string()));
                false
            }
        }
    }

    // --- export ---

    /// Export the design with selection handles hidden.
    ///
    /// The selection is restored afterwards, whether the export succeeded or not.
    pub async fn export(&mut self, format: ExportFormat) -> Result<ExportArtifact, EditorError> {
        if self.gesture.is_some() {
            return Err(EditorError::GestureInProgress);
        }

        let hidden = self.selection.take();
        self.render.handles = true;
        self.loading = true;

        let exporter = Arc::clone(&self.exporter);
        let result = exporter.export(&self.canvas, format).await;

        self.loading = false;
        self.selection = hidden;
        self.render.handles = true;

        match result {
            Ok(artifact) => {
                log::info!("Exported design as {} ({} bytes)", format, artifact.bytes.len());
                Ok(artifact)
            }
            Err(e) => {
                log::error!("Export as {} failed: {}", format, e);
                Err(e.into())
            }
        }
    }

    // --- zoom ---

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - self.config.zoom_step)
    }

    /// Set the zoom factor, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return self.zoom;
        }
        // Round to two decimals so repeated steps do not drift.
        let zoom = (zoom.clamp(self.config.min_zoom, self.config.max_zoom) * 100.0).round() / 100.0;
        self.zoom = zoom;
        self.render.canvas = true;
        self.render.handles = true;
        zoom
    }

    // --- keyboard ---

    /// Run the command bound to a key press. Returns the command that ran.
    pub async fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Result<Option<EditorCommand>, EditorError> {
        let Some(command) = ShortcutRegistry::lookup(key, modifiers) else {
            return Ok(None);
        };
        self.execute(command).await?;
        Ok(Some(command))
    }

    pub async fn execute(&mut self, command: EditorCommand) -> Result<(), EditorError> {
        match command {
            EditorCommand::Undo => {
                self.undo();
            }
            EditorCommand::Redo => {
                self.redo();
            }
            EditorCommand::Save => {
                self.save_now().await?;
            }
            EditorCommand::DeleteSelection => {
                if self.selection.is_some() {
                    self.delete_selected()?;
                }
            }
            EditorCommand::Deselect => {
                // A gesture only ends on pointer-up.
                if self.gesture.is_none() {
                    self.deselect();
                }
            }
            EditorCommand::ZoomIn => {
                self.zoom_in();
            }
            EditorCommand::ZoomOut => {
                self.zoom_out();
            }
        }
        Ok(())
    }
}
