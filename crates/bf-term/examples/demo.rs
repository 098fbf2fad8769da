// SPDX-License-Identifier: MIT
//
// bf-term demo — a scrolling checkerboard with a key readout.
//
// Exercises the whole pipeline without the animator: Terminal, StdinReader,
// Parser, FrameBuffer, DiffRenderer and the tick loop. Press keys to see
// them decoded, resize to see the frame rebuilt. `q` or Ctrl-C quits.
//
// Usage:
//   cargo run -p bf-term --example demo

use bf_term::buffer::FrameBuffer;
use bf_term::cell::Attr;
use bf_term::color::CellColor;
use bf_term::event_loop::{Action, App, EventLoop, LoopConfig};
use bf_term::input::{Event, KeyCode};
use bf_term::terminal::Size;

struct Demo {
    size: Size,
    tick: u64,
    last_key: String,
    keys: u64,
}

impl App for Demo {
    fn on_event(&mut self, event: &Event) -> Action {
        let Event::Key(key) = event;
        if key.is_interrupt() || key.code == KeyCode::Char('q') {
            return Action::Quit;
        }
        self.keys += 1;
        self.last_key = format!("{:?} {:?}", key.code, key.modifiers);
        Action::Continue
    }

    fn on_resize(&mut self, size: Size) {
        self.size = size;
    }

    fn on_tick(&mut self) -> bool {
        self.tick += 1;
        true
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        let (w, h) = (buf.width(), buf.height());
        buf.fill_rect(0, 0, w, h, CellColor::WHITE);

        // One column per four ticks.
        let shift = (self.tick / 4) as usize;
        for y in 0..h {
            let row: String = (0..usize::from(w))
                .map(|x| if (x + shift + usize::from(y)) % 2 == 1 { '·' } else { ' ' })
                .collect();
            buf.paint_text(0, y, &row, CellColor::Rgb(153, 153, 153), None, Attr::empty());
        }

        let lines = [
            format!(" {}x{}  tick {} ", self.size.cols, self.size.rows, self.tick),
            format!(" keys {}  last: {} ", self.keys, self.last_key),
            " q quits ".to_owned(),
        ];
        for (y, line) in (1..).zip(&lines) {
            buf.paint_text(2, y, line, CellColor::BLACK, Some(CellColor::WHITE), Attr::BOLD);
        }
    }
}

fn main() {
    let mut event_loop = EventLoop::with_config(LoopConfig::from_fps(30)).unwrap_or_else(|e| {
        eprintln!("demo: failed to initialize terminal: {e}");
        std::process::exit(1);
    });

    let mut demo = Demo {
        size: event_loop.size(),
        tick: 0,
        last_key: "-".to_owned(),
        keys: 0,
    };

    match event_loop.run(&mut demo) {
        Ok(summary) => println!(
            "{} frames, {} cells, {} bytes",
            summary.frames, summary.cells_rendered, summary.bytes_written
        ),
        Err(e) => {
            eprintln!("demo: {e}");
            std::process::exit(1);
        }
    }
}
