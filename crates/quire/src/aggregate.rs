use crate::content::ContentItem;
use crate::error::{QuireError, Result};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TagHistogram {
    pub tags: Vec<TagCount>,
    pub max_count: usize,
}

impl TagHistogram {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for item in items.into_iter().filter(|item| item.is_eligible()) {
            for tag in &item.tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }

        let max_count = counts.values().copied().max().unwrap_or(0);
        let tags = counts
            .into_iter()
            .map(|(name, count)| TagCount {
                name: name.to_string(),
                count,
            })
            .collect();

        Self { tags, max_count }
    }

    pub fn total(&self) -> usize {
        self.tags.iter().map(|tag| tag.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
    pub months: Vec<MonthCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DateHistogram {
    pub years: Vec<YearCount>,
}

impl DateHistogram {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Self {
        let mut monthly: BTreeMap<(i32, u32), usize> = BTreeMap::new();
        for date in items
            .into_iter()
            .filter(|item| item.is_eligible())
            .filter_map(|item| item.date)
        {
            *monthly.entry((date.year(), date.month())).or_default() += 1;
        }

        let mut years: Vec<YearCount> = Vec::new();
        for ((year, month), count) in monthly.into_iter().rev() {
            match years.last_mut() {
                Some(bucket) if bucket.year == year => {
                    bucket.count += count;
                    bucket.months.push(MonthCount { month, count });
                }
                _ => years.push(YearCount {
                    year,
                    count,
                    months: vec![MonthCount { month, count }],
                }),
            }
        }

        Self { years }
    }

    pub fn year(&self, year: i32) -> Option<&YearCount> {
        self.years.iter().find(|bucket| bucket.year == year)
    }
}

/// Scales `value` from `0..=high` onto `min..=max`, used for tag cloud sizes.
pub fn font_size(min: u32, max: u32, high: usize, value: usize) -> Result<u32> {
    if max < min {
        return Err(QuireError::InvalidArgument {
            message: format!("max ({max}) cannot be less than min ({min})"),
        });
    }
    if value > high {
        return Err(QuireError::InvalidArgument {
            message: format!("value ({value}) cannot be greater than high ({high})"),
        });
    }
    if high == 0 {
        return Ok(min);
    }

    let scaled = (value as f64 / high as f64) * f64::from(max - min) + f64::from(min);
    Ok(scaled as u32)
}
