//! Player-facing text: end-of-round summary and HUD strings

use crate::countdown_digit;
use crate::sim::{GamePhase, GameState};

/// Summary tier, chosen by how the round went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTier {
    NewHighScore,
    Amazing,
    Great,
    GameOver,
}

impl SummaryTier {
    pub fn for_round(score: u32, new_high_score: bool) -> Self {
        if new_high_score {
            SummaryTier::NewHighScore
        } else if score > 30 {
            SummaryTier::Amazing
        } else if score > 15 {
            SummaryTier::Great
        } else {
            SummaryTier::GameOver
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SummaryTier::NewHighScore => "🏆",
            SummaryTier::Amazing => "🎉",
            SummaryTier::Great => "👍",
            SummaryTier::GameOver => "💪",
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            SummaryTier::NewHighScore => "NEW HIGH SCORE!",
            SummaryTier::Amazing => "Amazing!",
            SummaryTier::Great => "Great Job!",
            SummaryTier::GameOver => "Game Over!",
        }
    }
}

/// End-of-round overlay content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub tier: SummaryTier,
    pub score: u32,
    pub high_score: u32,
}

impl RoundSummary {
    pub fn compose(score: u32, high_score: u32, new_high_score: bool) -> Self {
        Self {
            tier: SummaryTier::for_round(score, new_high_score),
            score,
            high_score,
        }
    }

    pub fn from_state(state: &GameState) -> Self {
        Self::compose(state.score, state.high_score, state.is_new_high_score)
    }

    pub fn detail(&self) -> String {
        if self.tier == SummaryTier::NewHighScore {
            format!("You survived {} seconds!", self.score)
        } else {
            format!("You survived {} seconds", self.score)
        }
    }

    /// "High Score: Ns" line, hidden until there is a record
    pub fn high_score_line(&self) -> Option<String> {
        (self.high_score > 0).then(|| format!("High Score: {}s", self.high_score))
    }

    /// Overlay markup
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div class=\"summary-emoji\">{}</div>\
             <div class=\"summary-headline\">{}</div>\
             <div class=\"summary-detail\">{}</div>",
            self.tier.emoji(),
            self.tier.headline(),
            self.detail()
        );
        if let Some(line) = self.high_score_line() {
            html.push_str(&format!("<div class=\"summary-high\">{}</div>", line));
        }
        html
    }
}

/// Countdown overlay text, if counting down
pub fn countdown_text(state: &GameState) -> Option<(String, &'static str)> {
    (state.phase == GamePhase::Countdown)
        .then(|| (countdown_digit(state.countdown).to_string(), "Get Ready!"))
}
