use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::types::Order;

/// Receives each simulated day's orders as soon as they exist.
pub trait OrderSink {
    fn accept(&mut self, day: NaiveDate, orders: &[Order]) -> Result<()>;
}

impl OrderSink for Vec<Order> {
    fn accept(&mut self, _day: NaiveDate, orders: &[Order]) -> Result<()> {
        self.extend_from_slice(orders);
        Ok(())
    }
}

#[derive(Serialize)]
struct OrderLine<'a> {
    shopping_cart_id: Uuid,
    day: NaiveDate,
    created_at: &'a DateTime<Utc>,
    completed_at: &'a Option<DateTime<Utc>>,
}

/// Writes one JSON object per order, tagging each with a fresh v4 UUID.
pub struct JsonLinesSink<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OrderSink for JsonLinesSink<W> {
    fn accept(&mut self, day: NaiveDate, orders: &[Order]) -> Result<()> {
        for order in orders {
            let line = OrderLine {
                shopping_cart_id: Uuid::new_v4(),
                day,
                created_at: &order.created_at,
                completed_at: &order.completed_at,
            };
            serde_json::to_writer(&mut self.out, &line)?;
            self.out.write_all(b"\n")?;
            self.written += 1;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_orders() -> Vec<Order> {
        let t = Utc.with_ymd_and_hms(2024, 6, 9, 8, 30, 0).unwrap();
        vec![
            Order {
                created_at: t,
                completed_at: Some(t + Duration::minutes(3)),
            },
            Order {
                created_at: t + Duration::hours(1),
                completed_at: None,
            },
        ]
    }

    #[test]
    fn vec_sink_collects() {
        let mut sink: Vec<Order> = Vec::new();
        let day = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        sink.accept(day, &sample_orders()).unwrap();
        sink.accept(day, &sample_orders()).unwrap();
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn json_lines_one_object_per_order() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.accept(day, &sample_orders()).unwrap();
        assert_eq!(sink.written(), 2);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["day"], "2024-06-09");
        assert!(lines[0]["completed_at"].is_string());
        assert!(lines[1]["completed_at"].is_null());
        assert_ne!(lines[0]["shopping_cart_id"], lines[1]["shopping_cart_id"]);
    }
}
