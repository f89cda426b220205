//! Dashboard aggregates computed from the store.

use twinforge_types::{DashboardStats, DeviceStatus, UserId};

use crate::store::EntityStore;

impl EntityStore {
    /// Headline numbers for `user`'s dashboard.
    ///
    /// Counts come from the store. Data points are simulated as one
    /// million per device holding a non-zero reading. The trend labels are
    /// fixed presentation values.
    pub fn dashboard_stats(&self, user: UserId) -> DashboardStats {
        let owner = Some(user);
        let active_twins = self.twins.values().filter(|t| t.user_id == owner).count();
        let projects = self.projects.values().filter(|p| p.user_id == owner).count();
        let connected_devices = self
            .devices
            .values()
            .filter(|d| d.status == DeviceStatus::Connected)
            .count();
        let reporting = self
            .devices
            .values()
            .filter(|d| d.last_value.is_some_and(|v| v != 0.0))
            .count();

        DashboardStats {
            active_twins,
            active_twins_growth: "+12%".to_owned(),
            connected_devices,
            data_points: format!("{reporting}.0M"),
            data_points_growth: "+8%".to_owned(),
            processing_time: "3.2h".to_owned(),
            processing_time_change: "-24%".to_owned(),
            accuracy_rate: "98.7%".to_owned(),
            accuracy_rate_change: "+1.2%".to_owned(),
            projects,
            templates: self.templates.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use twinforge_types::{DeviceId, DeviceUpdate};

    use super::*;

    #[test]
    fn empty_store_has_zero_counts() {
        let stats = EntityStore::new().dashboard_stats(UserId::new(1));
        assert_eq!(stats.active_twins, 0);
        assert_eq!(stats.connected_devices, 0);
        assert_eq!(stats.data_points, "0.0M");
        assert_eq!(stats.accuracy_rate, "98.7%");
    }

    #[test]
    fn sample_data_stats() {
        let stats = EntityStore::with_sample_data().dashboard_stats(UserId::new(1));
        assert_eq!(stats.active_twins, 3);
        assert_eq!(stats.connected_devices, 3);
        assert_eq!(stats.data_points, "3.0M");
        assert_eq!(stats.projects, 3);
        assert_eq!(stats.templates, 3);
    }

    #[test]
    fn other_user_sees_no_twins() {
        let stats = EntityStore::with_sample_data().dashboard_stats(UserId::new(42));
        assert_eq!(stats.active_twins, 0);
        assert_eq!(stats.projects, 0);
        assert_eq!(stats.templates, 3);
    }

    #[test]
    fn zero_reading_is_not_a_data_point() {
        let mut store = EntityStore::with_sample_data();
        store.update_device(
            DeviceId::new(1),
            DeviceUpdate {
                last_value: Some(Some(0.0)),
                ..DeviceUpdate::default()
            },
        );
        assert_eq!(store.dashboard_stats(UserId::new(1)).data_points, "2.0M");
    }
}
