//! Terminal rendering for a bagging session.
//!
//! Everything writes to a `dyn Write` so the same output can go to stdout,
//! a report file, or a buffer in tests.

use colored::{ColoredString, Colorize};
use smartbag_engine::{Bag, BaggingError, Category, Item, PlacementEvent, Position, Progress};
use std::io::{self, Write};

use crate::glyphs::{DEFAULT_GLYPH, glyph_for};

const PROGRESS_WIDTH: usize = 20;

/// Item label tinted by its most sensitive category.
fn paint(item: &Item) -> ColoredString {
    let label = format!("{} {}", glyph_for(&item.icon), item.name);
    if item.has_category(Category::Meat) {
        label.bright_red()
    } else if item.has_category(Category::Produce) {
        label.green()
    } else if item.has_category(Category::Chemical) {
        label.red().bold()
    } else if item.has_category(Category::Cold) {
        label.bright_blue()
    } else {
        label.normal()
    }
}

pub fn write_scan(out: &mut dyn Write, item: &Item) -> io::Result<()> {
    writeln!(
        out,
        "📷 Barcode scanned successfully: {} {}",
        glyph_for(&item.icon),
        item.name
    )
}

pub fn write_toast(out: &mut dyn Write, event: &PlacementEvent) -> io::Result<()> {
    writeln!(out, "🔔 {}", event.title().bold())?;
    writeln!(out, "   {}", event.description().dimmed())?;
    if event.opened_new_bag {
        writeln!(out, "   {}", format!("Opened {}", event.bag_name).yellow())?;
    }
    Ok(())
}

pub fn write_bag(out: &mut dyn Write, bag: &Bag, items_per_bag: usize) -> io::Result<()> {
    writeln!(
        out,
        "{} {} ({}/{items_per_bag})",
        DEFAULT_GLYPH,
        bag.name.bold(),
        bag.len()
    )?;
    if bag.is_empty() {
        writeln!(out, "   {}", "(empty)".dimmed())?;
        return Ok(());
    }
    for position in Position::STACKED {
        let labels: Vec<String> = bag
            .items_at(position)
            .map(|item| paint(item).to_string())
            .collect();
        if labels.is_empty() {
            continue;
        }
        writeln!(out, "   {:>6} │ {}", position.as_str(), labels.join(", "))?;
    }
    Ok(())
}

pub fn write_bags(out: &mut dyn Write, bags: &[Bag], items_per_bag: usize) -> io::Result<()> {
    for bag in bags {
        write_bag(out, bag, items_per_bag)?;
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(progress: Progress) -> String {
    let filled = ((progress.percent() / 100.0) * PROGRESS_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_WIDTH);
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(PROGRESS_WIDTH - filled)
    )
}

pub fn write_progress(out: &mut dyn Write, progress: Progress) -> io::Result<()> {
    writeln!(
        out,
        "{} {} of {} items bagged ({:.0}%)",
        progress_bar(progress).cyan(),
        progress.placed,
        progress.total,
        progress.percent()
    )
}

pub fn write_next_item(out: &mut dyn Write, next: Option<&Item>) -> io::Result<()> {
    match next {
        Some(item) => writeln!(out, "   Next up: {}", paint(item)),
        None => Ok(()),
    }
}

pub fn write_exhausted(out: &mut dyn Write, err: &BaggingError) -> io::Result<()> {
    writeln!(out, "✅ {}", "All items processed".green().bold())?;
    writeln!(out, "   There are no more items to bag.")?;
    log::debug!("stepper stopped: {err}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartbag_engine::{BaggingConfig, BaggingSession, Catalog};

    fn text(write: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn bag_rendering_stacks_top_before_bottom() {
        let catalog = Catalog::load_default().unwrap();
        let config = BaggingConfig::default().with_total_items(5);
        let (done, _) = BaggingSession::new(&catalog, &config, 1)
            .unwrap()
            .run_to_completion();
        let rendered = text(|out| write_bag(out, &done.bags()[0], 5));

        assert!(rendered.contains("Bag 1"));
        assert!(rendered.contains("(5/5)"));
        let top = rendered.find("top").unwrap();
        let middle = rendered.find("middle").unwrap();
        let bottom = rendered.find("bottom").unwrap();
        assert!(top < middle && middle < bottom);
        assert!(rendered.contains("Milk"));
    }

    #[test]
    fn empty_bag_is_marked() {
        let rendered = text(|out| write_bag(out, &Bag::numbered(2), 5));
        assert!(rendered.contains("Bag 2"));
        assert!(rendered.contains("(empty)"));
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        let half = progress_bar(Progress {
            placed: 10,
            total: 20,
        });
        assert_eq!(half.matches('█').count(), PROGRESS_WIDTH / 2);
        let done = progress_bar(Progress {
            placed: 0,
            total: 0,
        });
        assert_eq!(done.matches('█').count(), PROGRESS_WIDTH);

        let line = text(|out| {
            write_progress(
                out,
                Progress {
                    placed: 3,
                    total: 20,
                },
            )
        });
        assert!(line.contains("3 of 20 items bagged"));
    }

    #[test]
    fn toast_names_bag_and_position() {
        let catalog = Catalog::load_default().unwrap();
        let step = BaggingSession::start(&catalog, &BaggingConfig::default(), 1).unwrap();
        let rendered = text(|out| write_toast(out, &step.event));
        assert!(rendered.contains("Bagged: Milk"));
        assert!(rendered.contains("Placed in Bag 1 at bottom position"));
    }

    #[test]
    fn exhaustion_notice_is_friendly() {
        let err = BaggingError::NoMoreItems {
            placed: 20,
            total: 20,
        };
        let rendered = text(|out| write_exhausted(out, &err));
        assert!(rendered.contains("All items processed"));
        assert!(rendered.contains("There are no more items to bag"));
    }
}
