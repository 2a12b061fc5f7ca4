use std::fmt::Write;

use crate::models::trip::{DiningOption, TravelTip, TripPlan};

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn slot_label(slot: &str) -> &'static str {
    match slot {
        "morning" => "🌅 Morning",
        "afternoon" => "☀️ Afternoon",
        "evening" => "🌙 Evening",
        _ => "⏰ Anytime",
    }
}

/// Subject line and HTML body for a trip plan email.
pub fn render_trip_email(plan: &TripPlan) -> (String, String) {
    let subject = format!("Your Trip Plan to {}", plan.destination);
    let destination = escape_html(&plan.destination);
    let end = plan
        .date
        .checked_add_signed(chrono::Duration::days(i64::from(plan.duration)))
        .unwrap_or(plan.date);

    let mut days = String::new();
    for (index, day) in plan.itinerary.iter().enumerate() {
        let _ = write!(
            days,
            r#"<div class="day"><h2>Day {} <small>{}</small></h2>"#,
            index + 1,
            escape_html(&day.date)
        );
        for (slot, activity) in day.activities.slots() {
            let Some(activity) = activity.filter(|a| !a.activity_name.is_empty()) else {
                continue;
            };
            let _ = write!(
                days,
                r#"<div class="activity"><h3>{}</h3><h4>{}</h4>"#,
                slot_label(slot),
                escape_html(&activity.activity_name)
            );
            for (label, value) in [
                ("Duration", &activity.estimated_duration),
                ("Location", &activity.location),
                ("Getting there", &activity.route_information),
            ] {
                if !value.is_empty() {
                    let _ = write!(
                        days,
                        "<p><strong>{}:</strong> {}</p>",
                        label,
                        escape_html(value)
                    );
                }
            }
            days.push_str("</div>");
        }
        days.push_str("</div>");
    }

    let hotels = list_section(
        "🏨 Hotels",
        plan.hotel_recommendations.iter().map(|h| {
            format!(
                "{} <em>{}</em>",
                escape_html(&h.name),
                escape_html(&h.pricing_details)
            )
        }),
    );
    let dining = list_section(
        "🍽️ Dining",
        plan.dining_options.iter().map(|d| match d {
            DiningOption::Plain { text } => escape_html(text),
            DiningOption::Structured {
                name,
                cuisine,
                price_range,
            } => format!(
                "{}, {}, {}",
                escape_html(name),
                escape_html(cuisine),
                escape_html(price_range)
            ),
        }),
    );
    let tips = list_section(
        "💡 Travel Tips",
        plan.travel_tips.iter().map(|t| match t {
            TravelTip::Plain { text } => escape_html(text),
            TravelTip::Structured { title, body } => {
                format!("<strong>{}:</strong> {}", escape_html(title), escape_html(body))
            }
        }),
    );
    let events = list_section(
        "🎉 Local Events",
        plan.local_events.iter().map(|e| {
            format!(
                "<strong>{}</strong> ({}) {}",
                escape_html(&e.event_name),
                escape_html(&e.date),
                escape_html(&e.description)
            )
        }),
    );
    let reservations = list_section(
        "🎟️ Reservations",
        plan.reservations.iter().map(|r| {
            format!(
                r#"<a href="{}">{}</a> {} {}"#,
                escape_html(&r.booking_link),
                escape_html(&r.attraction_name),
                escape_html(&r.recommended_timeframe),
                escape_html(&r.estimated_cost)
            )
        }),
    );

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{subject}</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background-color: #f8f9fa; padding: 20px; border-radius: 5px; text-align: center; }}
        .day {{ border-bottom: 1px solid #eee; padding: 10px 0; }}
        .footer {{ margin-top: 30px; font-size: 14px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{destination}</h1>
            <p>{start} to {end} ({duration} days)</p>
        </div>
        {days}{hotels}{dining}{tips}{events}{reservations}
        <div class="footer"><p>Have a great trip!</p></div>
    </div>
</body>
</html>"#,
        subject = escape_html(&subject),
        destination = destination,
        start = plan.date.format("%B %-d, %Y"),
        end = end.format("%B %-d, %Y"),
        duration = plan.duration,
        days = days,
        hotels = hotels,
        dining = dining,
        tips = tips,
        events = events,
        reservations = reservations,
    );

    (subject, html)
}

fn list_section(title: &str, items: impl Iterator<Item = String>) -> String {
    let items: Vec<String> = items.map(|item| format!("<li>{}</li>", item)).collect();
    if items.is_empty() {
        return String::new();
    }
    format!("<h2>{}</h2><ul>{}</ul>", title, items.concat())
}
