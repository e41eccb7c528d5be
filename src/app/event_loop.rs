use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::timer::Debouncer;
use crate::watcher::{STORE_DEBOUNCE_MS, StoreWatcher};

/// Quiet time after the last edit before the preview re-renders.
pub const PREVIEW_DEBOUNCE_MS: u64 = 150;
/// Quiet time after the last resize event before the layout reflows.
pub const RESIZE_DEBOUNCE_MS: u64 = 100;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: zenmark requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let mut model = Model::new(std::mem::take(&mut self.state), (size.width, size.height))
            .with_sync_direction(self.sync_direction);
        model.export_dir.clone_from(&self.export_dir);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);

        if let Some(path) = self.initial_file.clone() {
            Self::dispatch(&mut model, Message::OpenFile(path));
        }

        let store_watcher = self.make_store_watcher(&mut model);

        let result = Self::event_loop(&mut terminal, &mut model, store_watcher);

        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn make_store_watcher(&self, model: &mut Model) -> Option<StoreWatcher> {
        if !self.watch_enabled {
            return None;
        }
        let path = model.state.store_path()?.to_path_buf();
        match StoreWatcher::new(&path, STORE_DEBOUNCE_MS) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "state watcher unavailable");
                model.show_toast(ToastLevel::Warning, format!("Sync between windows off: {err}"));
                crate::perf::log_event(
                    "watcher.error",
                    format!("failed path={} err={err}", path.display()),
                );
                None
            }
        }
    }

    /// Apply `msg` to the model, then perform its side effects.
    pub(super) fn dispatch(model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, &side_msg);
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        mut store_watcher: Option<StoreWatcher>,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer: Debouncer<(u16, u16)> = Debouncer::new(RESIZE_DEBOUNCE_MS);
        let mut preview_debouncer: Debouncer<u64> = Debouncer::new(PREVIEW_DEBOUNCE_MS);
        let mut seen_revision = model.state.revision();
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                Self::dispatch(model, Message::Resize(width, height));
                needs_render = true;
            }

            // Every text change re-arms the preview timer.
            let revision = model.state.revision();
            if revision != seen_revision {
                seen_revision = revision;
                if model.preview_stale() {
                    preview_debouncer.queue(revision, now_ms);
                }
            }
            if let Some(revision) = preview_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "preview.debounced",
                    format!("frame={frame_idx} revision={revision}"),
                );
                Self::dispatch(model, Message::RefreshPreview);
                needs_render = true;
            }

            if store_watcher
                .as_mut()
                .is_some_and(|watcher| watcher.poll(now_ms))
            {
                Self::dispatch(model, Message::StoreChanged);
                seen_revision = model.state.revision();
                needs_render = true;
            }

            if model.scroll_sync.tick(now_ms) {
                crate::perf::log_event("scroll.release", format!("frame={frame_idx}"));
            }

            let timers_pending = resize_debouncer.is_pending()
                || preview_debouncer.is_pending()
                || model.scroll_sync.driving().is_some()
                || store_watcher
                    .as_ref()
                    .is_some_and(|watcher| watcher.remaining_ms(now_ms).is_some());
            let poll_ms = if needs_render {
                0
            } else if timers_pending {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let msg =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                if let Some(msg) = msg {
                    crate::perf::log_event(
                        "event.message",
                        format!("frame={frame_idx} msg={msg:?}"),
                    );
                    Self::dispatch(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                let mut drained = 0_u32;
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        Self::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        drained += 1;
                        Self::dispatch(model, msg);
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }

            if needs_render {
                frame_idx += 1;
                let frame_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                model.apply_scroll_sync(frame_ms);

                let draw_start = Instant::now();
                terminal.draw(|frame| Self::view(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
