use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// The single execution context of the application.
///
/// Every pane mutation, idle-poll step and translation answer is handled on
/// this loop, one callback at a time. Translation calls run on worker threads
/// but their answers are only applied from here, so pane state never needs a
/// lock.
///
/// The handler is called with:
/// - `Some(event)` for each input event;
/// - `None` once per iteration, after input has been drained or the poll
///   timed out. That is where the idle scheduler is stepped, finished
///   translations are applied, and the screen is redrawn.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(None)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (held keys, large pastes) before the next
                // idle step so a single frame sees all of them.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn burst_is_drained_between_idle_steps() {
        let script = Scripted(VecDeque::from(vec![key('a'), key('b'), key('q')]));
        let mut lp = EventLoop::new(script, Duration::from_millis(1));
        let mut seen = Vec::new();
        lp.run(|event| {
            match event {
                None => seen.push("idle".to_string()),
                Some(Event::Key(k)) if k.code == KeyCode::Char('q') => {
                    return Ok(ControlFlow::Quit);
                }
                Some(Event::Key(k)) => seen.push(format!("{:?}", k.code)),
                Some(_) => {}
            }
            Ok(ControlFlow::Continue)
        })
        .unwrap();
        assert_eq!(seen, vec!["idle", "Char('a')", "Char('b')"]);
    }

    #[test]
    fn idle_step_can_quit() {
        let mut lp = EventLoop::new(Scripted(VecDeque::new()), Duration::from_millis(1));
        let mut steps = 0;
        lp.run(|_| {
            steps += 1;
            Ok(if steps == 3 {
                ControlFlow::Quit
            } else {
                ControlFlow::Continue
            })
        })
        .unwrap();
        assert_eq!(steps, 3);
    }
}
