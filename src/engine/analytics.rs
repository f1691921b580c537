//! Read-only analytics rollups over the booking store

use std::collections::HashMap;

use chrono::Timelike;
use serde::Serialize;

use crate::types::{BookingStatus, RoomId};

use super::BookingEngine;

/// Organization-wide booking counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub approved_bookings: usize,
    pub rejected_bookings: usize,
    pub cancelled_bookings: usize,
    pub total_rooms: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_booked_room: Option<String>,
    /// Start hour with the most bookings, formatted "HH:00".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_booking_time: Option<String>,
}

/// Per-room utilization: share of bookings that ended up approved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUtilization {
    pub room_id: RoomId,
    pub room_name: String,
    pub total_bookings: usize,
    pub approved_bookings: usize,
    pub utilization_percentage: f64,
}

impl BookingEngine {
    /// Aggregate counters over all bookings, plus the busiest room and hour.
    pub fn analytics_summary(&self) -> AnalyticsSummary {
        let mut summary = AnalyticsSummary {
            total_bookings: 0,
            pending_bookings: 0,
            approved_bookings: 0,
            rejected_bookings: 0,
            cancelled_bookings: 0,
            total_rooms: self.rooms.len(),
            most_booked_room: None,
            peak_booking_time: None,
        };

        let mut per_room: HashMap<RoomId, usize> = HashMap::new();
        let mut per_hour: HashMap<u32, usize> = HashMap::new();

        for booking in self.bookings.iter() {
            summary.total_bookings += 1;
            match booking.status {
                BookingStatus::Pending => summary.pending_bookings += 1,
                BookingStatus::Approved => summary.approved_bookings += 1,
                BookingStatus::Rejected => summary.rejected_bookings += 1,
                BookingStatus::Cancelled => summary.cancelled_bookings += 1,
            }
            *per_room.entry(booking.room_id).or_default() += 1;
            *per_hour.entry(booking.slot.start.hour()).or_default() += 1;
        }

        summary.most_booked_room = per_room
            .iter()
            .max_by_key(|(room_id, count)| (**count, std::cmp::Reverse(**room_id)))
            .and_then(|(room_id, _)| self.rooms.get(room_id).map(|r| r.name.clone()));

        summary.peak_booking_time = per_hour
            .iter()
            .max_by_key(|(hour, count)| (**count, std::cmp::Reverse(**hour)))
            .map(|(hour, _)| format!("{:02}:00", hour));

        summary
    }

    /// Utilization stats per room, busiest rooms first.
    pub fn room_utilization(&self) -> Vec<RoomUtilization> {
        let mut stats: Vec<RoomUtilization> = self
            .rooms
            .iter()
            .map(|room| {
                let mut total = 0usize;
                let mut approved = 0usize;
                for booking in self.bookings.iter() {
                    if booking.room_id == room.id {
                        total += 1;
                        if booking.status == BookingStatus::Approved {
                            approved += 1;
                        }
                    }
                }
                let utilization = if total > 0 {
                    (approved as f64 * 100.0 / total as f64 * 100.0).round() / 100.0
                } else {
                    0.0
                };
                RoomUtilization {
                    room_id: room.id,
                    room_name: room.name.clone(),
                    total_bookings: total,
                    approved_bookings: approved,
                    utilization_percentage: utilization,
                }
            })
            .collect();

        stats.sort_by(|a, b| {
            b.total_bookings
                .cmp(&a.total_bookings)
                .then(a.room_id.cmp(&b.room_id))
        });
        stats
    }
}
