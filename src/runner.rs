use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::ui::UiFrame;

/// Drive `app` until `should_quit` says so.
///
/// Every idle tick redraws through `draw`; every input event goes to
/// `should_quit` first and then to `dispatch`. Mouse capture is switched on
/// for the duration of the run.
pub fn run_app<O, D, A, FDraw, FDispatch, FQuit>(
    output: &mut O,
    driver: &mut D,
    app: &mut A,
    poll_interval: Duration,
    mut draw: FDraw,
    mut dispatch: FDispatch,
    mut should_quit: FQuit,
) -> io::Result<()>
where
    O: OutputDriver,
    D: InputDriver,
    FDraw: FnMut(&mut UiFrame<'_>, &mut A),
    FDispatch: FnMut(&Event, &mut A) -> bool,
    FQuit: FnMut(Option<&Event>, &mut A) -> bool,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    let result = event_loop.run(|_driver, event| {
        match event {
            Some(evt) => {
                if should_quit(Some(&evt), app) {
                    return Ok(ControlFlow::Quit);
                }
                if !dispatch(&evt, app) {
                    tracing::trace!(event = ?evt, "event not handled");
                }
            }
            None => {
                if should_quit(None, app) {
                    return Ok(ControlFlow::Quit);
                }
                output.draw(|mut frame| draw(&mut frame, app))?;
            }
        }
        Ok(ControlFlow::Continue)
    });

    let _ = event_loop.driver().set_mouse_capture(false);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use std::collections::VecDeque;

    struct Scripted {
        events: VecDeque<Event>,
        capture: Vec<bool>,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("no scripted events left"))
        }

        fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
            self.capture.push(enabled);
            Ok(())
        }
    }

    struct Offscreen {
        buffer: Buffer,
        frames: usize,
    }

    impl OutputDriver for Offscreen {
        fn enter(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn exit(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn draw<F>(&mut self, f: F) -> io::Result<()>
        where
            F: FnOnce(UiFrame<'_>),
        {
            self.frames += 1;
            let area = self.buffer.area;
            f(UiFrame::from_parts(area, &mut self.buffer));
            Ok(())
        }
    }

    #[test]
    fn dispatches_until_quit_and_restores_capture() {
        let mut driver = Scripted {
            events: VecDeque::from(vec![
                Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
                Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            ]),
            capture: Vec::new(),
        };
        let mut output = Offscreen {
            buffer: Buffer::empty(Rect::new(0, 0, 4, 1)),
            frames: 0,
        };
        let mut dispatched: Vec<Event> = Vec::new();
        run_app(
            &mut output,
            &mut driver,
            &mut dispatched,
            Duration::from_millis(0),
            |frame, _| frame.set_string(frame.area(), 0, 0, "ok", Default::default()),
            |event, seen| {
                seen.push(event.clone());
                true
            },
            |event, _| {
                matches!(event, Some(Event::Key(k)) if k.code == KeyCode::Char('q'))
            },
        )
        .unwrap();
        assert_eq!(dispatched.len(), 1);
        assert_eq!(output.frames, 1);
        assert_eq!(output.buffer[(0, 0)].symbol(), "o");
        assert_eq!(driver.capture, vec![true, false]);
    }
}
