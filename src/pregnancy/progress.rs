//! Gestational week arithmetic and the weekly content shown alongside it.

use serde::Serialize;
use time::{Date, Duration};

pub const FULL_TERM_WEEKS: u8 = 40;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct BabySize {
    pub week: u8,
    pub size: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Tip {
    pub week: u8,
    pub tip: &'static str,
    pub important: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Milestone {
    pub week: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

// Each table is sorted by week.
pub const BABY_SIZES: &[BabySize] = &[
    BabySize { week: 1, size: "Size of a poppy seed", description: "The fertilized egg is tiny but already carries your baby's entire genetic code." },
    BabySize { week: 5, size: "Size of an apple seed", description: "The baby's heart starts beating this week!" },
    BabySize { week: 8, size: "Size of a raspberry", description: "All the major organs have started to develop." },
    BabySize { week: 16, size: "Size of an avocado", description: "The baby starts hearing sounds from the outside world." },
    BabySize { week: 20, size: "Size of a banana", description: "Halfway there! The baby can kick and turn." },
    BabySize { week: 24, size: "Size of an ear of corn", description: "The lungs are developing quickly." },
    BabySize { week: 28, size: "Size of an eggplant", description: "The baby can open their eyes and blink." },
    BabySize { week: 32, size: "Size of a cabbage", description: "The baby is gaining weight quickly." },
    BabySize { week: 36, size: "Size of a melon", description: "The baby is practicing breathing." },
    BabySize { week: 40, size: "Size of a pumpkin", description: "Ready for the world! The baby is fully developed." },
];

pub const TIPS: &[Tip] = &[
    Tip { week: 1, tip: "Start taking folic acid if you haven't already.", important: true },
    Tip { week: 4, tip: "Schedule your first prenatal appointment.", important: true },
    Tip { week: 8, tip: "Talk to your doctor about prenatal vitamins.", important: true },
    Tip { week: 12, tip: "Do light exercise regularly.", important: false },
    Tip { week: 16, tip: "Start thinking about baby names!", important: false },
    Tip { week: 20, tip: "Get the anatomy scan to check the baby's development.", important: true },
    Tip { week: 24, tip: "Start planning the nursery.", important: false },
    Tip { week: 28, tip: "Take the glucose tolerance test.", important: true },
    Tip { week: 32, tip: "Pack the hospital bag.", important: true },
    Tip { week: 36, tip: "Talk to your doctor about the birth plan.", important: true },
    Tip { week: 40, tip: "Rest and watch for the first signs of labor.", important: true },
];

pub const MILESTONES: &[Milestone] = &[
    Milestone { week: 4, title: "Positive Test", description: "Pregnancy confirmed", icon: "🎯" },
    Milestone { week: 8, title: "First Ultrasound", description: "Hearing the baby's heartbeat", icon: "💓" },
    Milestone { week: 12, title: "End of First Trimester", description: "Miscarriage risk drops", icon: "✅" },
    Milestone { week: 20, title: "Anatomy Scan", description: "Checking the baby's anatomy", icon: "👶" },
    Milestone { week: 24, title: "Viability", description: "Baby could survive outside the womb with medical help", icon: "🏥" },
    Milestone { week: 28, title: "Third Trimester", description: "The countdown begins", icon: "⏱️" },
    Milestone { week: 37, title: "Full Term", description: "Baby is ready to be born any time now", icon: "👶" },
];

const MAX_TIPS: usize = 3;

pub fn due_date(start: Date) -> Date {
    start
        .checked_add(Duration::weeks(FULL_TERM_WEEKS as i64))
        .unwrap_or(Date::MAX)
}

/// Weeks elapsed since `start`, rounded up and capped at full term. A start
/// date in the future counts as week 0 on purpose, instead of being read as
/// the distance to that date.
pub fn current_week(start: Date, today: Date) -> u8 {
    let days = (today - start).whole_days();
    if days <= 0 {
        return 0;
    }
    let weeks = (days + 6) / 7;
    weeks.min(FULL_TERM_WEEKS as i64) as u8
}

/// Negative once the due date has passed.
pub fn days_until_due(start: Date, today: Date) -> i64 {
    (due_date(start) - today).whole_days()
}

pub fn progress_percent(week: u8) -> u8 {
    let pct = (week as u32 * 100).div_ceil(FULL_TERM_WEEKS as u32);
    pct.min(100) as u8
}

pub fn baby_size(week: u8) -> &'static BabySize {
    BABY_SIZES
        .iter()
        .rev()
        .find(|s| s.week <= week)
        .unwrap_or(&BABY_SIZES[0])
}

pub fn milestone(week: u8) -> Option<&'static Milestone> {
    MILESTONES.iter().rev().find(|m| m.week <= week)
}

/// Up to three tips that apply by `week`, most recent first.
pub fn tips(week: u8) -> Vec<&'static Tip> {
    TIPS.iter()
        .rev()
        .filter(|t| t.week <= week)
        .take(MAX_TIPS)
        .collect()
}
