use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::{ThrottleCurve, TransportEndpoint};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("no active transport is configured")]
    NoActiveTransport,
}

/// Per-transport cumulative counter over one warmup curve. The permitted
/// rate is a function of how many messages this transport has already been
/// scheduled to send.
#[derive(Debug)]
pub struct RateController<'a> {
    curve: &'a ThrottleCurve,
    sent: u64,
}

impl<'a> RateController<'a> {
    pub fn new(curve: &'a ThrottleCurve) -> Self {
        Self { curve, sent: 0 }
    }

    pub fn current_rate(&self) -> f64 {
        self.curve.rate_at(self.sent)
    }

    pub fn record_send(&mut self) {
        self.sent += 1;
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledSlot {
    pub transport: TransportEndpoint,
    pub scheduled_at: DateTime<Utc>,
}

struct TransportLane<'a> {
    transport: TransportEndpoint,
    controller: RateController<'a>,
    last_scheduled_at: Option<DateTime<Utc>>,
}

/// Assigns `count` sends round-robin over the active transports and computes
/// each send's timestamp from the transport's own warmup state.
///
/// Gap arithmetic runs in integer nanoseconds with a ceiling conversion, so
/// two sends on one transport are never closer than `1/current_rate`. All
/// lanes share the campaign start instant and the same curve, which keeps the
/// slot sequence non-decreasing across the whole plan.
#[tracing::instrument(skip_all, fields(count = count))]
pub fn build_schedule(
    count: usize,
    transports: &[TransportEndpoint],
    curve: &ThrottleCurve,
    start: DateTime<Utc>,
) -> Result<Vec<ScheduledSlot>, SchedulingError> {
    let mut lanes: Vec<TransportLane> = transports
        .iter()
        .filter(|transport| transport.is_active())
        .map(|transport| TransportLane {
            transport: transport.clone(),
            controller: RateController::new(curve),
            last_scheduled_at: None,
        })
        .collect();

    if lanes.is_empty() {
        return Err(SchedulingError::NoActiveTransport);
    }

    let mut slots = Vec::with_capacity(count);
    for assignment in 0..count {
        let lane = &mut lanes[assignment % lanes.len()];

        let scheduled_at = match lane.last_scheduled_at {
            None => start,
            Some(previous) => previous + min_gap(lane.controller.current_rate()),
        };

        lane.controller.record_send();
        lane.last_scheduled_at = Some(scheduled_at);
        slots.push(ScheduledSlot {
            transport: lane.transport.clone(),
            scheduled_at,
        });
    }

    Ok(slots)
}

fn min_gap(rate_per_sec: f64) -> Duration {
    Duration::nanoseconds((1e9 / rate_per_sec).ceil() as i64)
}

#[cfg(test)]
mod test {
    use super::{RateController, SchedulingError, build_schedule};
    use crate::domain::{ThrottleCurve, TransportEndpoint};
    use chrono::{TimeZone, Utc};
    use claims::{assert_err, assert_ok};
    use secrecy::SecretString;

    fn curve() -> ThrottleCurve {
        ThrottleCurve::new(1.0, 10.0, vec![100, 500, 1000]).unwrap()
    }

    fn endpoint(host: &str) -> TransportEndpoint {
        TransportEndpoint {
            host: host.to_string(),
            port: 587,
            user: "mailer".to_string(),
            pass: SecretString::from("secret".to_string()),
        }
    }

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn the_controller_tracks_the_curve_as_sends_accumulate() {
        let curve = curve();
        let mut controller = RateController::new(&curve);
        assert_eq!(controller.current_rate(), 1.0);

        for _ in 0..100 {
            controller.record_send();
        }
        assert_eq!(controller.sent(), 100);
        assert_eq!(controller.current_rate(), 4.0);
    }

    #[test]
    fn scheduling_with_no_active_transport_fails() {
        let transports = vec![endpoint(""), endpoint("   ")];
        let result = build_schedule(5, &transports, &curve(), start());
        assert_eq!(assert_err!(result), SchedulingError::NoActiveTransport);
    }

    #[test]
    fn the_first_send_on_each_transport_happens_at_the_start_instant() {
        let transports = vec![endpoint("a.example"), endpoint("b.example")];
        let slots = assert_ok!(build_schedule(2, &transports, &curve(), start()));
        assert_eq!(slots[0].scheduled_at, start());
        assert_eq!(slots[1].scheduled_at, start());
        assert_eq!(slots[0].transport.host, "a.example");
        assert_eq!(slots[1].transport.host, "b.example");
    }

    #[test]
    fn gaps_on_one_transport_respect_the_current_rate() {
        let curve = ThrottleCurve::new(2.0, 8.0, vec![3]).unwrap();
        let transports = vec![endpoint("a.example")];
        let slots = assert_ok!(build_schedule(6, &transports, &curve, start()));

        for (i, pair) in slots.windows(2).enumerate() {
            // Slot i+1 was computed after i+1 recorded sends on this lane.
            let rate = curve.rate_at(i as u64 + 1);
            let gap = (pair[1].scheduled_at - pair[0].scheduled_at)
                .num_nanoseconds()
                .unwrap();
            assert!(
                gap as f64 >= 1e9 / rate,
                "gap {gap}ns below minimum for rate {rate}"
            );
        }
    }

    #[test]
    fn inactive_transports_are_excluded_from_the_rotation() {
        let transports = vec![endpoint("a.example"), endpoint(""), endpoint("b.example")];
        let slots = assert_ok!(build_schedule(4, &transports, &curve(), start()));
        let hosts: Vec<&str> = slots.iter().map(|s| s.transport.host.as_str()).collect();
        assert_eq!(hosts, vec!["a.example", "b.example", "a.example", "b.example"]);
    }

    #[test]
    fn the_plan_wide_slot_sequence_is_non_decreasing() {
        let transports = vec![endpoint("a.example"), endpoint("b.example")];
        let slots = assert_ok!(build_schedule(50, &transports, &curve(), start()));
        for pair in slots.windows(2) {
            assert!(pair[0].scheduled_at <= pair[1].scheduled_at);
        }
    }

    #[test]
    fn warmed_up_transports_send_faster() {
        let curve = ThrottleCurve::new(1.0, 10.0, vec![2]).unwrap();
        let transports = vec![endpoint("a.example")];
        let slots = assert_ok!(build_schedule(4, &transports, &curve, start()));

        let first_gap = (slots[1].scheduled_at - slots[0].scheduled_at)
            .num_milliseconds();
        let warmed_gap = (slots[3].scheduled_at - slots[2].scheduled_at)
            .num_milliseconds();
        assert_eq!(first_gap, 1000);
        assert_eq!(warmed_gap, 100);
    }
}
