//! Display text (Simplified Chinese, as shipped) and small formatting helpers.

use crate::round::{RoundResult, Verdict};

pub const TITLE: &str = "瞬间计数挑战";
pub const LEVEL_CAPTION: &str = "当前关卡";
pub const SCORE_CAPTION: &str = "累计分数";
pub const MUSIC_ON_TITLE: &str = "关闭音乐";
pub const MUSIC_OFF_TITLE: &str = "开启音乐";

pub const START_HEADLINE: &str = "准备好你的眼睛了吗？";
pub const RULES_HEADING: &str = "得分规则：";

/// Scoring rules for the start screen; the time limit follows `input_secs`.
pub fn rules(input_secs: u32) -> [(&'static str, String); 5] {
    [
        ("精准计数：", "获得基础分 + 连击奖励（每连击一次 +5分）。".to_string()),
        ("漏算补偿：", "若输入的数量小于实际数量，将按比例获得得分，但连击会重置。".to_string()),
        ("多算惩罚：", "若输入的数量大于实际数量，则本轮不得分，连击重置。".to_string()),
        ("限时回答：", format!("必须在 {input_secs}秒 内提交答案，超时视为0分。")),
        ("基础得分：", "关卡越高，基础分越高（第5关基础分为 100）。".to_string()),
    ]
}
pub const START_BUTTON: &str = "开始挑战";

pub const COUNTDOWN_HINT: &str = "准备展示...";
pub const INPUT_PROMPT: &str = "你看到了多少只？";
pub const CLEAR_BUTTON: &str = "清除";
pub const CONFIRM_BUTTON: &str = "确定 (Enter)";

pub const GAMEOVER_HEADLINE: &str = "挑战圆满结束!";
pub const GAMEOVER_CAPTION: &str = "最终获得的总分";
pub const RESTART_BUTTON: &str = "再试一次";

pub const FOOTER: &str = "使用键盘数字或点击面板输入 • 回车键确认 • 音乐由 Web Audio API 实时合成";

pub fn level_progress(level_id: u32, total: usize) -> String {
    format!("{level_id} / {total}")
}

pub fn input_timer(secs: u32) -> String {
    format!("剩余时间: {secs}s")
}

/// Current answer, or a placeholder when nothing has been typed.
pub fn answer_display(input: &str) -> &str {
    if input.is_empty() { "?" } else { input }
}

pub fn verdict_glyph(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Perfect => "✓",
        Verdict::Close => "±",
        Verdict::Miss => "✗",
    }
}

pub fn verdict_headline(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Perfect => "完美正确！",
        Verdict::Close => "计数较接近",
        Verdict::Miss => "多算或漏算过多",
    }
}

/// CSS color for the feedback block.
pub fn verdict_color(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Perfect => "#34d399",
        Verdict::Close => "#fbbf24",
        Verdict::Miss => "#f87171",
    }
}

pub fn actual_line(result: &RoundResult) -> String {
    format!("正确答案是: {}", result.actual)
}

pub fn guessed_line(result: &RoundResult) -> String {
    format!("你的回答: {}", result.guessed)
}

pub fn gained_line(result: &RoundResult) -> String {
    format!("+{} 分", result.gained_points)
}

/// Streak badge, shown only for an exact answer that extends a streak past one.
pub fn streak_badge(result: &RoundResult) -> Option<String> {
    (result.is_correct && result.streak_after > 1).then(|| format!("连击 X{}!", result.streak_after))
}

/// Thousands-grouped score ("12,345").
pub fn format_score(score: u32) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(verdict: Verdict, streak_after: u32) -> RoundResult {
        RoundResult {
            level_id: 2,
            is_correct: verdict == Verdict::Perfect,
            actual: 5,
            guessed: 5,
            gained_points: 25,
            streak_after,
            verdict,
        }
    }

    #[test]
    fn score_grouping() {
        assert_eq!(format_score(0), "0");
        assert_eq!(format_score(999), "999");
        assert_eq!(format_score(1000), "1,000");
        assert_eq!(format_score(1234567), "1,234,567");
    }

    #[test]
    fn streak_badge_needs_exact_answer_and_streak() {
        assert_eq!(streak_badge(&result(Verdict::Perfect, 1)), None);
        assert_eq!(streak_badge(&result(Verdict::Perfect, 3)).as_deref(), Some("连击 X3!"));
        assert_eq!(streak_badge(&result(Verdict::Close, 0)), None);
    }

    #[test]
    fn time_limit_rule_follows_input_window() {
        assert_eq!(rules(3)[3].1, "必须在 3秒 内提交答案，超时视为0分。");
        assert_eq!(rules(5)[3].1, "必须在 5秒 内提交答案，超时视为0分。");
        assert_eq!(rules(5)[0].0, "精准计数：");
    }

    #[test]
    fn feedback_lines() {
        let r = result(Verdict::Perfect, 2);
        assert_eq!(actual_line(&r), "正确答案是: 5");
        assert_eq!(gained_line(&r), "+25 分");
        assert_eq!(verdict_glyph(Verdict::Miss), "✗");
        assert_eq!(answer_display(""), "?");
        assert_eq!(answer_display("12"), "12");
        assert_eq!(input_timer(2), "剩余时间: 2s");
    }
}
