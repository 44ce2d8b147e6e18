use termimad::{
    MadSkin,
    crossterm::style::{Attribute, Color, Stylize},
};
use worklog_core::{Report, ReportLine};
use worklog_core::report::{format_day_header, format_duration};

#[derive(Clone)]
pub struct RenderOptions {
    pub date_format: String,
    pub use_color: bool,
}

pub struct Renderer {
    skin: MadSkin,
    opts: RenderOptions,
}

impl Renderer {
    pub fn new(config: Option<RenderOptions>) -> Self {
        Self {
            skin: default_skin(),
            opts: match config {
                Some(config) => config,
                None => RenderOptions {
                    date_format: "%A, %d %b %Y".to_string(),
                    use_color: true,
                },
            },
        }
    }

    pub fn print_md(&self, md: &str) {
        self.skin.print_text(md);
    }

    pub fn print_info(&self, message: &str) {
        println!("{message}");
    }

    pub fn print_report(&self, report: &Report) {
        let header = format_day_header(report.date, &self.opts.date_format);
        if self.opts.use_color {
            self.print_md(&header);
        } else {
            println!("{header}");
        }

        if report.lines.is_empty() {
            self.print_info("No work logged.");
            return;
        }

        for line in &report.lines {
            self.print_log_line(line);
        }

        println!();
        if report.rollup.is_empty() {
            self.print_info("Nothing to roll up.");
            return;
        }
        for row in &report.rollup {
            let total = format_duration(row.total);
            let mut description = row.description.clone();
            let mut total_col = format!("{total:>8}");
            if self.opts.use_color {
                description = description.with(Color::Yellow).to_string();
                total_col = total_col.with(Color::Green).to_string();
            }
            println!("{total_col}  {description}");
        }
        let mut total = format!("{:>8}  total", format_duration(report.total));
        if self.opts.use_color {
            total = total.with(Color::Cyan).bold().to_string();
        }
        println!("{total}");
    }

    fn print_log_line(&self, line: &ReportLine) {
        let mut time = line.time.format("%H:%M:%S").to_string();
        let mut label = if line.is_stop() {
            "(stop)".to_string()
        } else {
            line.description.clone()
        };
        let note = match line.duration {
            Some(duration) => Some(format!("({})", format_duration(duration))),
            None if line.ongoing => Some("(ongoing)".to_string()),
            None => None,
        };
        if self.opts.use_color {
            time = time.with(Color::Blue).to_string();
            label = if line.is_stop() {
                label.with(Color::DarkGrey).to_string()
            } else {
                label.with(Color::Yellow).to_string()
            };
        }
        match note {
            Some(note) if self.opts.use_color => {
                println!("{time} - {label} {}", note.with(Color::Green));
            }
            Some(note) => println!("{time} - {label} {note}"),
            None => println!("{time} - {label}"),
        }
    }
}

fn default_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.headers[0].set_fg(Color::Cyan);
    skin.headers[0].add_attr(Attribute::Bold);
    skin.headers[1].set_fg(Color::Yellow);
    skin.inline_code.set_fg(Color::Green);
    skin
}
