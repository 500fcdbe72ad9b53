use colored::Colorize;
use std::io::{self, Write};

use crate::glyphs::glyph_for;

pub struct GuideTip {
    pub icon: &'static str,
    pub title: &'static str,
    pub body: &'static str,
}

pub const TIPS: [GuideTip; 6] = [
    GuideTip {
        icon: "milk",
        title: "Heavy Items on Bottom",
        body: "Place heavier items like milk, canned goods, and bottles at the bottom of the bag.",
    },
    GuideTip {
        icon: "egg",
        title: "Fragile Items on Top",
        body: "Place eggs, bread, chips, and other easily crushed items at the top of the bag.",
    },
    GuideTip {
        icon: "milk",
        title: "Cold Items Together",
        body: "Group frozen and refrigerated items together to maintain temperature.",
    },
    GuideTip {
        icon: "citrus",
        title: "Separate Chemicals",
        body: "Keep cleaning products and chemicals separate from food items.",
    },
    GuideTip {
        icon: "beef",
        title: "Meat Separately",
        body: "Bag raw meat separately or with other meat products to prevent cross-contamination.",
    },
    GuideTip {
        icon: "banana",
        title: "Protect Produce",
        body: "Keep produce away from items that could damage or contaminate them.",
    },
];

pub fn write_guide(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", "📋 Bagging Best Practices".bright_cyan().bold())?;
    writeln!(out, "{}", "=========================".cyan())?;
    for tip in &TIPS {
        writeln!(out, "{} {}", glyph_for(tip.icon), tip.title.bold())?;
        writeln!(out, "   {}", tip.body)?;
    }
    Ok(())
}
