use crate::model::{PetState, Status};
use crate::ticker::{self, BarLevel, Face};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor, Attribute},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    #[cfg(test)]
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            *c = Cell {
                bg,
                ..Cell::default()
            };
        }
    }

    /// Text of row `y`, right-trimmed.
    #[cfg(test)]
    pub(crate) fn row_text(&self, y: u16) -> String {
        let start = self.idx(0, y);
        let s: String = self.cells[start..start + self.w as usize]
            .iter()
            .map(|c| c.ch)
            .collect();
        s.trim_end().to_string()
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Write the cells that changed since the last call.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = false;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                if last_bold != c.bold {
                    let attr = if c.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = c.bold;
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Pet sprite
------------------------------ */

const SPRITE_W: u16 = 13;

const EARS: &str = " /\\_______/\\ ";
const BODY: &str = "  \\_______/  ";
const LEGS: &str = "   ||   ||   ";

const DEAD_SPRITE: [&str; 5] = [
    "   _______   ",
    "  /       \\  ",
    " |  x   x  | ",
    "  \\  ___  /  ",
    "   |_|_|_|   ",
];

/// Sprite rows for the current state. Eating adds a bowl, playing a ball.
pub(crate) fn sprite(st: &PetState) -> Vec<&'static str> {
    let (eyes, mouth) = match ticker::face(st) {
        Face::Dead => return DEAD_SPRITE.to_vec(),
        Face::Content => (" |  o   o  | ", " |    w    | "),
        Face::Resting => (" |  -   -  | ", " |    .    | "),
        Face::Distressed => (" |  >   <  | ", " |   ~~~   | "),
    };
    let mut rows = vec![EARS, eyes, mouth, BODY, LEGS];
    match st.status {
        Status::Eating => rows.push("    (===)    "),
        Status::Playing => rows.push("          o  "),
        Status::Sleeping => rows[0] = " /\\_______/\\z",
        Status::Idle | Status::Dead => {}
    }
    rows
}

/* -----------------------------
   Screen
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                bg,
                bold: false,
            },
        );
    }
}

fn bar(value01: f32, width: usize) -> String {
    let v = value01.clamp(0.0, 1.0);
    let fill = (v * width as f32 + 0.5) as usize;
    let mut s = String::new();
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

fn level_color(level: BarLevel, enable_color: bool) -> Color {
    if !enable_color {
        return Color::White;
    }
    match level {
        BarLevel::Good => Color::Green,
        BarLevel::Warn => Color::Yellow,
        BarLevel::Critical => Color::Red,
    }
}

/// Paint the whole screen for `st`. Reads the state only.
pub(crate) fn draw_screen(buf: &mut CellBuffer, st: &PetState, enable_color: bool) {
    let bg = Color::Black;
    let fg = Color::White;
    let dim = Color::DarkGrey;
    let screen_fg = if st.sleeping && enable_color {
        Color::Blue
    } else {
        fg
    };

    buf.clear(bg);

    let title = format!("CAVA-OS  |  AGE {}  |  T+{}", st.age, st.ticks);
    draw_text(buf, 1, 0, &title, fg, bg);

    for (i, b) in ticker::bars(st).iter().enumerate() {
        let line = format!("{} {} {:>5.1}", b.label, bar(b.value / 100.0, 16), b.value);
        draw_text(buf, 1, 2 + i as u16, &line, level_color(b.level, enable_color), bg);
    }

    let pet_x = (buf.w.saturating_sub(SPRITE_W)) / 2;
    let pet_y = 8;
    if ticker::alert(st) {
        let red = if enable_color { Color::Red } else { fg };
        buf.set(
            pet_x + SPRITE_W / 2,
            pet_y - 1,
            Cell {
                ch: '!',
                fg: red,
                bg,
                bold: true,
            },
        );
    }
    let rows = sprite(st);
    for (i, row) in rows.iter().enumerate() {
        let color = if st.dead { dim } else { screen_fg };
        draw_text(buf, pet_x, pet_y + i as u16, row, color, bg);
    }

    let ticker_y = pet_y + rows.len() as u16 + 1;
    let label = format!("< {} >", st.status);
    draw_text(buf, centered(buf.w, &label), ticker_y, &label, screen_fg, bg);
    let banner = ticker::banner(st);
    draw_text(buf, centered(buf.w, banner), ticker_y + 1, banner, screen_fg, bg);

    let mut x = 1;
    for c in ticker::controls(st) {
        let text = format!("[{}] {}", c.key, c.label);
        draw_text(buf, x, ticker_y + 3, &text, if c.enabled { fg } else { dim }, bg);
        x += text.chars().count() as u16 + 2;
    }

    draw_text(
        buf,
        1,
        buf.h.saturating_sub(1),
        "Keys: f feed | p play | s sleep | r reset | c colour | q quit",
        dim,
        bg,
    );
}

fn centered(width: u16, s: &str) -> u16 {
    width.saturating_sub(s.chars().count() as u16) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{initial_state, Action};

    fn screen(st: &PetState) -> CellBuffer {
        let mut buf = CellBuffer::new(60, 24);
        draw_screen(&mut buf, st, true);
        buf
    }

    fn contains(buf: &CellBuffer, needle: &str) -> bool {
        (0..buf.h).any(|y| buf.row_text(y).contains(needle))
    }

    #[test]
    fn sprite_rows_share_width() {
        let mut states = vec![initial_state(), initial_state().apply(Action::Feed)];
        states.push(initial_state().apply(Action::Play));
        states.push(initial_state().apply(Action::ToggleSleep));
        states.push(PetState {
            dead: true,
            ..initial_state()
        });
        for st in states {
            for row in sprite(&st) {
                assert_eq!(row.chars().count(), SPRITE_W as usize, "{row:?}");
            }
        }
    }

    #[test]
    fn sprite_follows_status() {
        let eating = sprite(&initial_state().apply(Action::Feed));
        assert!(eating.iter().any(|r| r.contains("(===)")));
        let asleep = sprite(&initial_state().apply(Action::ToggleSleep));
        assert!(asleep[1].contains('-'));
    }

    #[test]
    fn screen_shows_stats_and_controls() {
        let buf = screen(&initial_state());
        assert!(contains(&buf, "AGE 0"));
        assert!(contains(&buf, "HGR"));
        assert!(contains(&buf, "UNIT OPERATIONAL"));
        assert!(contains(&buf, "[f] FEED"));
        assert!(contains(&buf, "[r] RESET"));
        assert!(contains(&buf, "< idle >"));
    }

    #[test]
    fn dead_screen() {
        let st = PetState {
            dead: true,
            status: Status::Dead,
            ..initial_state()
        };
        let buf = screen(&st);
        assert!(contains(&buf, "SYSTEM OFFLINE"));
        assert!(contains(&buf, "[r] REVIVE"));
        assert!(contains(&buf, "x   x"));
    }

    #[test]
    fn bar_colors_follow_levels() {
        let mut st = initial_state();
        st.vitals.hunger = 10.0;
        let buf = screen(&st);
        // HGR is the second bar row
        assert_eq!(buf.get(1, 3).map(|c| c.fg), Some(Color::Red));
        assert_eq!(buf.get(1, 2).map(|c| c.fg), Some(Color::Green));

        let mut mono = CellBuffer::new(60, 24);
        draw_screen(&mut mono, &st, false);
        assert_eq!(mono.get(1, 3).map(|c| c.fg), Some(Color::White));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut buf = CellBuffer::new(4, 3);
        draw_screen(&mut buf, &initial_state(), true);
        let mut empty = CellBuffer::new(0, 0);
        draw_screen(&mut empty, &initial_state(), true);
    }
}
