//! Delayed delivery (broadcast) payloads.
//!
//! A delivery is scheduled either by a one-off [`Interval`], by a recurring
//! [`WeeklyPlan`], or by a weekly plan bounded by an interval.
//! [`DelayedDelivery::schedule`] exposes whichever form was supplied.

use serde::Serialize;

use crate::canonical::Timestamp;
use crate::error::ViolationKind;
use crate::record::{RecordReader, RecordRules, Schema};
use crate::rules::{CLOCK_TIME, Choice, ListOf, Nested, TextRule, TimestampRule};
use crate::wire_enum::wire_enum;

wire_enum! {
    /// Publication state of a delivery.
    pub enum DeliveryState {
        /// Scheduled and sending.
        Active => "Active",
        /// Paused.
        Inactive => "Inactive",
        /// Being edited.
        Draft => "Draft",
    }
}

wire_enum! {
    /// Day of the week in a recurring plan.
    pub enum DayOfWeek {
        /// Monday.
        Monday => "Monday",
        /// Tuesday.
        Tuesday => "Tuesday",
        /// Wednesday.
        Wednesday => "Wednesday",
        /// Thursday.
        Thursday => "Thursday",
        /// Friday.
        Friday => "Friday",
        /// Saturday.
        Saturday => "Saturday",
        /// Sunday.
        Sunday => "Sunday",
    }
}

wire_enum! {
    /// How recipients are selected.
    pub enum FilterType {
        /// A fixed recipient list.
        Static => "static",
        /// Recipients matched at send time.
        Dynamic => "dynamic",
    }
}

wire_enum! {
    /// Content type of a delivery message.
    pub enum TextKind {
        /// Plain text.
        Text => "text",
    }
}

/// A one-off sending interval.
///
/// ## Invariants
/// - `end` is strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    /// First moment of the interval.
    pub start: Timestamp,
    /// Last moment of the interval.
    pub end: Timestamp,
}

impl Schema for Interval {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let start = fields.required("start", TimestampRule);
        let end = fields.required("end", TimestampRule);
        Some(Self {
            start: start?,
            end: end?,
        })
    }

    fn check(&self, rules: &mut RecordRules<'_>) {
        if self.end <= self.start {
            rules.violation("end", ViolationKind::CrossFieldViolation, "must be after start");
        }
    }
}

/// Days and time of a weekly send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EveryWeek {
    /// Days to send on; at least one.
    pub days_of_week: Vec<DayOfWeek>,
    /// Local send time as `HH:MM:SS`.
    pub time: String,
    /// Time zone the send time is read in.
    pub timezone: String,
}

impl Schema for EveryWeek {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let days_of_week =
            fields.required("daysOfWeek", ListOf::new(Choice::<DayOfWeek>::of()).non_empty());
        let time = fields.required("time", TextRule::non_blank().pattern(CLOCK_TIME));
        let timezone = fields.required("timezone", TextRule::non_blank());
        Some(Self {
            days_of_week: days_of_week?,
            time: time?,
            timezone: timezone?,
        })
    }
}

/// A recurring plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    /// The weekly recurrence.
    pub every_week: EveryWeek,
}

impl Schema for WeeklyPlan {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let every_week = fields.required("everyWeek", Nested::<EveryWeek>::of());
        Some(Self {
            every_week: every_week?,
        })
    }
}

/// Message content of a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryText {
    /// Message body.
    pub value: String,
    /// Content type.
    #[serde(rename = "type")]
    pub kind: TextKind,
}

impl Schema for DeliveryText {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let value = fields.required("value", TextRule::non_blank());
        let kind = fields.or("type", Choice::<TextKind>::of(), TextKind::Text);
        Some(Self {
            value: value?,
            kind: kind?,
        })
    }
}

/// One recipient filter.
///
/// The student id is accepted as `userPayload.studentId` or
/// `userPayload_studentId`; the dotted name wins when both are supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterItem {
    /// Recipient identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Recipient full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_full_name: Option<String>,
    /// Recipient phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,
    /// Student id from the recipient's payload.
    #[serde(
        rename = "userPayload.studentId",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_payload_student_id: Option<String>,
}

impl Schema for FilterItem {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let user_id = fields.optional("userId", TextRule::text());
        let user_full_name = fields.optional("userFullName", TextRule::text());
        let user_phone = fields.optional("userPhone", TextRule::text());
        let student_id =
            fields.aliased("userPayload.studentId", "userPayload_studentId", TextRule::text());
        Some(Self {
            user_id: user_id?,
            user_full_name: user_full_name?,
            user_phone: user_phone?,
            user_payload_student_id: student_id?.resolve().map(|resolved| resolved.into_value()),
        })
    }
}

/// When a delivery is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule<'a> {
    /// Once, within the interval.
    Once(&'a Interval),
    /// Every week, indefinitely.
    Weekly(&'a EveryWeek),
    /// Every week, only inside the interval.
    WeeklyWithin {
        /// The recurrence.
        plan: &'a EveryWeek,
        /// The bounding interval.
        interval: &'a Interval,
    },
}

/// Request body for creating a delayed delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayedDelivery {
    /// Sending service.
    pub service_id: String,
    /// Operator group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Target channel.
    pub channel_id: String,
    /// Publication state.
    pub state: DeliveryState,
    /// Internal name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Title shown to operators.
    pub title: String,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// One-off interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<Interval>,
    /// Recurring plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<WeeklyPlan>,
    /// Message content.
    pub text: DeliveryText,
    /// Recipient selection mode.
    pub filter_type: FilterType,
    /// Recipient filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<FilterItem>>,
}

impl DelayedDelivery {
    /// The schedule described by `interval` and `plan`, if any.
    #[must_use]
    pub fn schedule(&self) -> Option<Schedule<'_>> {
        match (&self.interval, &self.plan) {
            (Some(interval), Some(plan)) => Some(Schedule::WeeklyWithin {
                plan: &plan.every_week,
                interval,
            }),
            (Some(interval), None) => Some(Schedule::Once(interval)),
            (None, Some(plan)) => Some(Schedule::Weekly(&plan.every_week)),
            (None, None) => None,
        }
    }
}

impl Schema for DelayedDelivery {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let service_id = fields.required("serviceId", TextRule::non_blank());
        let group_id = fields.optional("groupId", TextRule::text());
        let channel_id = fields.required("channelId", TextRule::non_blank());
        let state = fields.required("state", Choice::<DeliveryState>::of());
        let name = fields.optional("name", TextRule::non_blank().max_chars(255));
        let title = fields.required("title", TextRule::non_blank().max_chars(255));
        let description = fields.optional("description", TextRule::text());
        let interval = fields.optional("interval", Nested::<Interval>::of());
        let plan = fields.optional("plan", Nested::<WeeklyPlan>::of());
        let text = fields.required("text", Nested::<DeliveryText>::of());
        let filter_type = fields.required("filterType", Choice::<FilterType>::of());
        let filter = fields.optional("filter", ListOf::new(Nested::<FilterItem>::of()));
        Some(Self {
            service_id: service_id?,
            group_id: group_id?,
            channel_id: channel_id?,
            state: state?,
            name: name?,
            title: title?,
            description: description?,
            interval: interval?,
            plan: plan?,
            text: text?,
            filter_type: filter_type?,
            filter: filter?,
        })
    }
}

/// A named template variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Var {
    /// Variable name, at most 100 characters.
    pub name: String,
    /// Variable value, at most 500 characters.
    pub value: String,
}

impl Schema for Var {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let name = fields.required("name", TextRule::non_blank().max_chars(100));
        let value = fields.required("value", TextRule::non_blank().max_chars(500));
        Some(Self {
            name: name?,
            value: value?,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Covers schedules, the weekly plan and recipient filters.

    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use super::*;
    use crate::validate;

    #[fixture]
    fn delivery() -> Value {
        json!({
            "serviceId": "42",
            "channelId": "telegram",
            "state": "Draft",
            "title": "  Weekly digest ",
            "text": { "value": "Hello" },
            "filterType": "static",
        })
    }

    #[rstest]
    #[case("2024-01-02T03:04:05Z", false)]
    #[case("2024-01-02T03:04:06Z", true)]
    fn interval_end_must_follow_start(#[case] end: &str, #[case] ok: bool) {
        let outcome = validate::<Interval>(&json!({ "start": "2024-01-02T03:04:05Z", "end": end }));
        assert_eq!(outcome.is_ok(), ok);
        if let Err(err) = outcome {
            assert_eq!(
                err.find("end").map(|violation| violation.kind()),
                Some(ViolationKind::CrossFieldViolation)
            );
        }
    }

    #[rstest]
    fn draft_needs_no_schedule(delivery: Value) {
        let parsed = validate::<DelayedDelivery>(&delivery).expect("valid draft");
        assert_eq!(parsed.title, "Weekly digest");
        assert_eq!(parsed.text.kind, TextKind::Text);
        assert!(parsed.schedule().is_none());
    }

    #[rstest]
    fn active_delivery_may_leave_schedule_open(mut delivery: Value) {
        delivery["state"] = json!("Active");
        let parsed = validate::<DelayedDelivery>(&delivery).expect("valid active delivery");
        assert_eq!(parsed.state, DeliveryState::Active);
        assert!(parsed.schedule().is_none());
    }

    #[rstest]
    fn plan_bounded_by_interval(mut delivery: Value) {
        delivery["state"] = json!("Active");
        delivery["interval"] = json!({ "start": "2024-01-01", "end": "2024-02-01" });
        delivery["plan"] = json!({
            "everyWeek": { "daysOfWeek": ["Monday", "Friday"], "time": "9:30:00", "timezone": "Europe/Moscow" },
        });
        let parsed = validate::<DelayedDelivery>(&delivery).expect("valid delivery");
        let Some(Schedule::WeeklyWithin { plan, interval }) = parsed.schedule() else {
            panic!("expected a bounded weekly schedule");
        };
        assert_eq!(plan.days_of_week, vec![DayOfWeek::Monday, DayOfWeek::Friday]);
        assert_eq!(interval.end.to_canonical(), "2024-02-01T00:00:00Z");
    }

    #[rstest]
    #[case(json!({ "daysOfWeek": [], "time": "10:00:00", "timezone": "UTC" }), "plan.everyWeek.daysOfWeek")]
    #[case(json!({ "daysOfWeek": ["Funday"], "time": "10:00:00", "timezone": "UTC" }), "plan.everyWeek.daysOfWeek[0]")]
    #[case(json!({ "daysOfWeek": ["Monday"], "time": "25:00:00", "timezone": "UTC" }), "plan.everyWeek.time")]
    #[case(json!({ "daysOfWeek": ["Monday"], "time": "10:00:00", "timezone": " " }), "plan.everyWeek.timezone")]
    fn weekly_plan_violations(mut delivery: Value, #[case] every_week: Value, #[case] path: &str) {
        delivery["plan"] = json!({ "everyWeek": every_week });
        let err = validate::<DelayedDelivery>(&delivery).expect_err("invalid plan");
        assert!(err.find(path).is_some(), "expected violation at {path}");
    }

    #[rstest]
    #[case(json!({ "userPayload.studentId": "s-1", "userPayload_studentId": "s-2" }), "s-1")]
    #[case(json!({ "userPayload_studentId": "s-2", "userPayload.studentId": "s-1" }), "s-1")]
    #[case(json!({ "userPayload_studentId": "s-2" }), "s-2")]
    fn dotted_student_id_wins(mut delivery: Value, #[case] filter: Value, #[case] expected: &str) {
        delivery["filter"] = json!([filter]);
        let parsed = validate::<DelayedDelivery>(&delivery).expect("valid filter");
        let student = parsed
            .filter
            .as_ref()
            .and_then(|items| items.first())
            .and_then(|item| item.user_payload_student_id.as_deref());
        assert_eq!(student, Some(expected));
        let serialised = serde_json::to_value(&parsed).expect("serialise");
        assert_eq!(serialised["filter"][0]["userPayload.studentId"], expected);
    }

    #[rstest]
    fn dotted_student_id_violation_is_quoted(mut delivery: Value) {
        delivery["filter"] = json!([{ "userPayload.studentId": 42 }]);
        let err = validate::<DelayedDelivery>(&delivery).expect_err("numeric student id");
        assert_eq!(
            err.find("filter[0][\"userPayload.studentId\"]")
                .map(|violation| violation.kind()),
            Some(ViolationKind::TypeMismatch)
        );
    }

    #[rstest]
    fn var_bounds() {
        let err = validate::<Var>(&json!({ "name": "n".repeat(101), "value": "" }))
            .expect_err("invalid var");
        assert_eq!(
            err.find("name").map(|violation| violation.kind()),
            Some(ViolationKind::OutOfRange)
        );
        assert_eq!(
            err.find("value").map(|violation| violation.kind()),
            Some(ViolationKind::MissingRequiredField)
        );
    }
}
