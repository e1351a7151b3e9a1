//! Spending report rendering.
//!
//! Groups a user's expenses by category and renders the per-category totals
//! as a PNG bar chart. Each call draws into its own buffer; no plotting
//! state outlives the call, so concurrent renders cannot interfere.

use std::collections::BTreeMap;
use std::io::Cursor;

use plotters::prelude::*;

use crate::{Category, EngineError, Expense, Money, ResultEngine};

const CHART_WIDTH: u32 = 1500;
const CHART_HEIGHT: u32 = 900;

fn draw_err(err: impl std::fmt::Display) -> EngineError {
    EngineError::Internal(format!("chart rendering failed: {err}"))
}

/// Per-category sums, ordered by total descending (category code breaks
/// ties). Categories with no records are absent.
pub fn category_totals(expenses: &[Expense]) -> Vec<(Category, Money)> {
    let mut totals: BTreeMap<Category, Money> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category).or_insert(Money::ZERO) += expense.amount;
    }

    let mut totals: Vec<_> = totals.into_iter().collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    totals
}

/// Renders the spending-by-category bar chart as PNG bytes.
///
/// Returns `None` for an empty record set; rendering is only attempted for
/// non-empty input and no partial chart is ever emitted.
pub fn spending_chart(expenses: &[Expense]) -> ResultEngine<Option<Vec<u8>>> {
    let totals = category_totals(expenses);
    if totals.is_empty() {
        return Ok(None);
    }

    let labels: Vec<&str> = totals.iter().map(|(category, _)| category.as_str()).collect();
    let y_max = (totals[0].1.units() * 1.1).max(1.0);

    let mut raw = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut raw, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Spending Distribution", ("sans-serif", 48))
            .margin(24)
            .x_label_area_size(70)
            .y_label_area_size(100)
            .build_cartesian_2d((0..totals.len()).into_segmented(), 0f64..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Category")
            .y_desc("Amount (USD)")
            .x_labels(totals.len())
            .x_label_formatter(&|value| match value {
                SegmentValue::CenterOf(index) => labels
                    .get(*index)
                    .map(|label| (*label).to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(totals.iter().enumerate().map(|(index, (_, total))| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(index), 0.0),
                        (SegmentValue::Exact(index + 1), total.units()),
                    ],
                    BLUE.filled(),
                )
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }

    let img = image::RgbImage::from_raw(CHART_WIDTH, CHART_HEIGHT, raw)
        .ok_or_else(|| EngineError::Internal("chart buffer size mismatch".to_string()))?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(draw_err)?;

    Ok(Some(png))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;

    fn expense(category: Category, cents: i64) -> Expense {
        let now = Utc::now();
        Expense {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: Money::new(cents),
            category,
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn totals_are_grouped_and_ordered_descending() {
        let expenses = vec![
            expense(Category::Groceries, 10_00),
            expense(Category::Utilities, 40_00),
            expense(Category::Groceries, 5_00),
            expense(Category::Entertainment, 20_00),
        ];

        let totals = category_totals(&expenses);
        assert_eq!(
            totals,
            vec![
                (Category::Utilities, Money::new(40_00)),
                (Category::Entertainment, Money::new(20_00)),
                (Category::Groceries, Money::new(15_00)),
            ]
        );
    }

    #[test]
    fn empty_set_renders_no_chart() {
        assert_eq!(spending_chart(&[]).unwrap(), None);
    }

    #[test]
    fn chart_bytes_carry_the_png_signature() {
        let png = spending_chart(&[expense(Category::Groceries, 12_34)])
            .unwrap()
            .unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }
}
