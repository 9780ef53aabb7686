//! Static reply texts and number formatting shared by every reply

pub const START_TEXT: &str = "👋 Welcome to TradeBuddy\n\n\
Your private trading journal.\n\n\
Commands:\n\
/trade – Log a trade\n\
/close – Close a trade\n\
/week – Weekly summary\n\
/stats – Quick stats\n\
/plan – Free vs Pro\n";

pub const PLAN_TEXT: &str = "🆓 Free: journaling + basic weekly summary\n\n\
💎 Pro ($2/month):\n\
- Full breakdown\n\
- Session & pair stats\n\
- Fate analysis\n\
- Unlimited history";

/// Format an R-multiple: whole numbers keep one decimal (`3.0`),
/// everything else prints its shortest exact form (`2.5`, `-0.75`).
pub fn fmt_r(value: f64) -> String {
    // "-0" is valid input; never show a signed zero
    let value = if value == 0.0 { 0.0 } else { value };
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
