//! 日历相关视图

use chrono::{Datelike, FixedOffset, NaiveDate};
use clinic_core::{utils::local_date, Appointment};

/// 按年份相减计算年龄，不考虑月日
pub fn age_from_birth_date(birth: NaiveDate, today: NaiveDate) -> i32 {
    today.year() - birth.year()
}

/// 指定日期的预约，时间戳按给定偏移换算成日历日期后比较
pub fn appointments_on(
    appointments: &[Appointment],
    date: NaiveDate,
    offset: &FixedOffset,
) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|apt| local_date(&apt.date_time, offset) == date)
        .cloned()
        .collect()
}

pub fn appointments_for_patient(appointments: &[Appointment], patient_id: u32) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|apt| apt.patient_id == patient_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::{utils::fixed_offset, AppointmentStatus};

    fn appointment(id: u32, patient_id: u32, at: &str) -> Appointment {
        Appointment {
            id,
            patient_id,
            patient_name: String::new(),
            date_time: at.parse().unwrap(),
            duration: 30,
            kind: "Consultation".to_string(),
            status: AppointmentStatus::Scheduled,
            notes: String::new(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_ignores_month_and_day() {
        assert_eq!(age_from_birth_date(date(2000, 6, 15), date(2024, 1, 1)), 24);
        assert_eq!(age_from_birth_date(date(2000, 1, 1), date(2024, 12, 31)), 24);
    }

    #[test]
    fn test_appointments_on_date() {
        let appointments = vec![
            appointment(1, 1, "2024-03-01T09:00:00Z"),
            appointment(2, 2, "2024-03-02T09:00:00Z"),
            appointment(3, 1, "2024-03-01T23:30:00Z"),
        ];
        let utc = fixed_offset(0).unwrap();

        let ids: Vec<u32> = appointments_on(&appointments, date(2024, 3, 1), &utc)
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_appointments_on_date_uses_offset() {
        let appointments = vec![appointment(3, 1, "2024-03-01T23:30:00Z")];
        let plus_two = fixed_offset(120).unwrap();
        assert!(appointments_on(&appointments, date(2024, 3, 1), &plus_two).is_empty());
        assert_eq!(appointments_on(&appointments, date(2024, 3, 2), &plus_two).len(), 1);
    }

    #[test]
    fn test_appointments_for_patient() {
        let appointments = vec![
            appointment(1, 1, "2024-03-01T09:00:00Z"),
            appointment(2, 2, "2024-03-02T09:00:00Z"),
        ];
        let mine = appointments_for_patient(&appointments, 2);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, 2);
    }
}
