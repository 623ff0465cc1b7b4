//! The selection session: one apply/cancel transaction over a selectable
//! object.
//!
//! A session owns the working selection from `start_session` until `apply`
//! or `cancel`. Every operation computes its result from the current
//! working selection and only replaces it once the result is complete, so a
//! failed operation leaves the selection as it was.

use log::{debug, info, warn};

use crate::{
    expand, select_right_candidates, AccumulationPolicy, Candidate, Geometry, RegionAlgorithm,
    Result, Selectable, Selection, SelectionError, SelectionSettings,
};

mod history;

pub use history::*;

/// Called with the selectable object and the final selection when a
/// session ends.
pub type Continuation<T> = Box<dyn FnOnce(&mut T, &Selection)>;

/// Called with the working selection after each change.
pub type RedrawCallback = Box<dyn FnMut(&Selection)>;

/// What happens to the selected pixels on apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Remove the selected pixels from the selectable object.
    #[default]
    Remove,
    /// Only commit the selection.
    Keep,
}

pub struct SessionOptions<T> {
    pub algorithm: RegionAlgorithm,
    pub policy: AccumulationPolicy,
    pub settings: SelectionSettings,
    pub apply_mode: ApplyMode,
    on_apply: Vec<Continuation<T>>,
    on_cancel: Vec<Continuation<T>>,
}

impl<T> SessionOptions<T> {
    pub fn new(algorithm: RegionAlgorithm, policy: AccumulationPolicy) -> Self {
        Self {
            algorithm,
            policy,
            settings: SelectionSettings::default(),
            apply_mode: ApplyMode::default(),
            on_apply: Vec::new(),
            on_cancel: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: SelectionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_apply_mode(mut self, apply_mode: ApplyMode) -> Self {
        self.apply_mode = apply_mode;
        self
    }

    /// Continuations run in insertion order after the selection is applied.
    pub fn on_apply(mut self, f: impl FnOnce(&mut T, &Selection) + 'static) -> Self {
        self.on_apply.push(Box::new(f));
        self
    }

    /// Continuations run in insertion order after the session is cancelled.
    pub fn on_cancel(mut self, f: impl FnOnce(&mut T, &Selection) + 'static) -> Self {
        self.on_cancel.push(Box::new(f));
        self
    }
}

pub struct SelectionSession<T> {
    algorithm: RegionAlgorithm,
    policy: AccumulationPolicy,
    settings: SelectionSettings,
    apply_mode: ApplyMode,
    history: History,
    on_apply: Vec<Continuation<T>>,
    on_cancel: Vec<Continuation<T>>,
}

impl<T> SelectionSession<T> {
    pub fn algorithm(&self) -> RegionAlgorithm {
        self.algorithm
    }

    pub fn policy(&self) -> AccumulationPolicy {
        self.policy
    }

    pub fn settings(&self) -> &SelectionSettings {
        &self.settings
    }

    pub fn apply_mode(&self) -> ApplyMode {
        self.apply_mode
    }

    /// The working selection.
    pub fn selection(&self) -> &Selection {
        self.history.current()
    }

    /// Whether the selection changed since the session started.
    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }
}

/// Drives selection sessions on at most one selectable object.
pub struct SelectionEngine<T> {
    target: Option<T>,
    session: Option<SelectionSession<T>>,
    redraw: Option<RedrawCallback>,
}

impl<T: Selectable> Default for SelectionEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Selectable> SelectionEngine<T> {
    pub fn new() -> Self {
        Self {
            target: None,
            session: None,
            redraw: None,
        }
    }

    pub fn with_target(target: T) -> Self {
        Self {
            target: Some(target),
            ..Self::new()
        }
    }

    /// Bind a new selectable object, returning the previous one.
    pub fn bind(&mut self, target: T) -> Result<Option<T>> {
        if self.session.is_some() {
            return Err(SelectionError::SessionActive);
        }
        Ok(self.target.replace(target))
    }

    pub fn unbind(&mut self) -> Result<Option<T>> {
        if self.session.is_some() {
            return Err(SelectionError::SessionActive);
        }
        Ok(self.target.take())
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn set_redraw_callback(&mut self, f: impl FnMut(&Selection) + 'static) {
        self.redraw = Some(Box::new(f));
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SelectionSession<T>> {
        self.session.as_ref()
    }

    /// The working selection while a session is active, the committed one
    /// of the bound object otherwise.
    pub fn selection(&self) -> Option<&Selection> {
        match &self.session {
            Some(session) => Some(session.selection()),
            None => self.target.as_ref().and_then(Selectable::selection),
        }
    }

    pub fn start_session(&mut self, options: SessionOptions<T>) -> Result<()> {
        if self.session.is_some() {
            return Err(SelectionError::SessionActive);
        }
        let target = self.target.as_ref().ok_or(SelectionError::NoSelectable)?;
        let labels = target.label_raster();
        let initial = match target.selection() {
            Some(selection) if selection.dim() == labels.dim() => selection.clone(),
            _ => Selection::none(labels),
        };
        let algorithm = supported_algorithm(target, options.algorithm);

        info!(
            "Start selection with {algorithm:?} and {:?}",
            options.policy
        );
        self.session = Some(SelectionSession {
            algorithm,
            policy: options.policy,
            settings: options.settings,
            apply_mode: options.apply_mode,
            history: History::new(initial),
            on_apply: options.on_apply,
            on_cancel: options.on_cancel,
        });
        Ok(())
    }

    pub fn set_algorithm(&mut self, algorithm: RegionAlgorithm) -> Result<()> {
        let target = self.target.as_ref().ok_or(SelectionError::NoSelectable)?;
        let session = self.session.as_mut().ok_or(SelectionError::NoSession)?;
        session.algorithm = supported_algorithm(target, algorithm);
        Ok(())
    }

    pub fn set_policy(&mut self, policy: AccumulationPolicy) -> Result<()> {
        let session = self.session.as_mut().ok_or(SelectionError::NoSession)?;
        session.policy = policy;
        Ok(())
    }

    pub fn set_settings(&mut self, settings: SelectionSettings) -> Result<()> {
        let session = self.session.as_mut().ok_or(SelectionError::NoSession)?;
        session.settings = settings;
        Ok(())
    }

    /// Run the active region algorithm and accumulation policy for one
    /// geometry event. Returns whether the selection changed.
    ///
    /// Degenerate geometry is ignored. An empty candidate leaves the
    /// selection untouched, except under `New` where an empty pixel
    /// candidate clears it.
    pub fn on_geometry(&mut self, geometry: &Geometry) -> Result<bool> {
        self.update(|target, session| {
            if geometry.is_degenerate() {
                debug!("Ignoring degenerate {geometry:?}");
                return Ok(None);
            }
            let labels = target.label_raster();
            let candidate = session
                .algorithm
                .candidate(target, geometry, &session.settings);
            let resets = session.policy == AccumulationPolicy::New
                && matches!(candidate, Candidate::Pixels(_));
            if candidate.is_empty() && !resets {
                debug!("Empty candidate for {geometry:?}");
                return Ok(None);
            }

            let mut next = session.selection().clone();
            session.policy.merge(&mut next, labels, &candidate);
            if session.settings.auto_expand && matches!(candidate, Candidate::Pixels(_)) {
                next = expand(&next, labels);
            }
            Ok(Some(next))
        })
    }

    pub fn on_rect_select(&mut self, start: [f64; 2], end: [f64; 2]) -> Result<bool> {
        self.on_geometry(&Geometry::Rect { start, end })
    }

    pub fn on_poly_select(&mut self, points: Vec<[f64; 2]>) -> Result<bool> {
        self.on_geometry(&Geometry::Polygon { points })
    }

    /// Select every labeled component.
    pub fn select_all(&mut self) -> Result<bool> {
        self.update(|target, _| Ok(Some(Selection::all(target.label_raster()))))
    }

    /// Reset to a selection without any selected pixel.
    pub fn clear(&mut self) -> Result<bool> {
        self.update(|target, _| Ok(Some(Selection::none(target.label_raster()))))
    }

    /// Select exactly the components that are not selected as a whole.
    pub fn invert(&mut self) -> Result<bool> {
        self.update(|target, session| {
            let labels = target.label_raster();
            let inverted = labels
                .ids()
                .difference(session.selection().labels())
                .copied()
                .collect();
            Ok(Some(Selection::from_labels(labels, inverted)))
        })
    }

    /// Grow the selection to every component it touches.
    pub fn expand(&mut self) -> Result<bool> {
        self.update(|target, session| Ok(Some(expand(session.selection(), target.label_raster()))))
    }

    /// Select everything right of the current selection within each column
    /// of the bound object.
    pub fn select_right(&mut self) -> Result<bool> {
        self.update(|target, session| {
            let bounds = target
                .column_bounds()
                .filter(|bounds| !bounds.is_empty())
                .ok_or(SelectionError::NoColumnBounds)?;
            let current = session.selection();
            if current.is_empty() {
                return Err(SelectionError::EmptySelection);
            }

            let labels = target.label_raster();
            let mask = select_right_candidates(current, labels, bounds);
            if !mask.iter().any(|&m| m) {
                debug!("Nothing right of the selection");
                return Ok(None);
            }
            let mut next = current.clone();
            session.policy.merge_pixels(&mut next, labels, mask.view());
            Ok(Some(next))
        })
    }

    pub fn undo(&mut self) -> Result<bool> {
        let session = self.session.as_mut().ok_or(SelectionError::NoSession)?;
        let Some(selection) = session.history.undo() else {
            return Ok(false);
        };
        info!("Undo");
        if let Some(redraw) = &mut self.redraw {
            redraw(selection);
        }
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool> {
        let session = self.session.as_mut().ok_or(SelectionError::NoSession)?;
        let Some(selection) = session.history.redo() else {
            return Ok(false);
        };
        info!("Redo");
        if let Some(redraw) = &mut self.redraw {
            redraw(selection);
        }
        Ok(true)
    }

    /// Commit the working selection to the bound object and run the apply
    /// continuations.
    pub fn apply(&mut self) -> Result<()> {
        let target = self.target.as_mut().ok_or(SelectionError::NoSelectable)?;
        let SelectionSession {
            apply_mode,
            history,
            on_apply,
            ..
        } = self.session.take().ok_or(SelectionError::NoSession)?;

        let selection = history.into_current();
        info!(
            "Apply selection of {} pixels ({apply_mode:?})",
            selection.selected_count()
        );
        target.set_selection(Some(selection.clone()));
        if apply_mode == ApplyMode::Remove {
            target.remove_selected(selection.selected_part().view());
            target.set_selection(None);
        }
        for f in on_apply {
            f(target, &selection);
        }
        Ok(())
    }

    /// Discard the working selection and run the cancel continuations. The
    /// bound object keeps the selection it had before the session.
    pub fn cancel(&mut self) -> Result<()> {
        let target = self.target.as_mut().ok_or(SelectionError::NoSelectable)?;
        let SelectionSession {
            history, on_cancel, ..
        } = self.session.take().ok_or(SelectionError::NoSession)?;

        info!("Cancel selection");
        let restored = history.initial();
        for f in on_cancel {
            f(target, restored);
        }
        if let Some(redraw) = &mut self.redraw {
            redraw(restored);
        }
        Ok(())
    }

    /// Replace the working selection with the result of `op`, if any.
    fn update(
        &mut self,
        op: impl FnOnce(&T, &SelectionSession<T>) -> Result<Option<Selection>>,
    ) -> Result<bool> {
        let target = self.target.as_ref().ok_or(SelectionError::NoSelectable)?;
        let session = self.session.as_mut().ok_or(SelectionError::NoSession)?;
        let Some(next) = op(target, session)? else {
            return Ok(false);
        };
        if !session.history.push(next) {
            return Ok(false);
        }
        if let Some(redraw) = &mut self.redraw {
            redraw(session.selection());
        }
        Ok(true)
    }
}

fn supported_algorithm<T: Selectable>(target: &T, algorithm: RegionAlgorithm) -> RegionAlgorithm {
    if algorithm == RegionAlgorithm::ColorWand && target.pixel_colors().is_none() {
        warn!("Color wand needs pixel colors, using the label wand instead");
        RegionAlgorithm::LabelWand
    } else {
        algorithm
    }
}
