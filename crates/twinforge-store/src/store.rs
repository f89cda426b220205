//! The in-memory entity store.
//!
//! [`EntityStore`] owns one keyed collection per entity kind and a single
//! identifier counter shared by all of them. Collections are
//! [`BTreeMap`]s keyed by id; because ids are handed out in increasing
//! order, iteration order is insertion order.
//!
//! # Design
//!
//! - **Synchronous**: every method runs to completion without awaiting.
//!   Callers that share the store across tasks wrap it in a lock, which
//!   makes each call atomic with respect to the others.
//! - **Never throws on lookup**: `get_*` returns `None` for an unknown id.
//! - **No referential integrity**: a project may point at a twin that
//!   does not exist.
//! - **No persistence**: state lives for the life of the process.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::debug;
use twinforge_types::{
    DeviceId, DeviceStatus, DeviceUpdate, DigitalTwin, IotDevice, NewDigitalTwin, NewIotDevice,
    NewProject, NewUser, NewWorkflowTemplate, Project, ProjectId, ProjectUpdate, TemplateId,
    TwinId, TwinStatus, TwinUpdate, User, UserId, WorkflowTemplate,
};

use crate::error::StoreError;
use crate::merge::{merge_device, merge_project, merge_twin};

/// Role assigned to users registered without one.
pub const DEFAULT_ROLE: &str = "user";

/// Status assigned to newly created projects.
pub const DEFAULT_PROJECT_STATUS: &str = "active";

/// In-memory keyed collections for every entity kind.
#[derive(Debug, Clone)]
pub struct EntityStore {
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) twins: BTreeMap<TwinId, DigitalTwin>,
    pub(crate) devices: BTreeMap<DeviceId, IotDevice>,
    pub(crate) templates: BTreeMap<TemplateId, WorkflowTemplate>,
    pub(crate) projects: BTreeMap<ProjectId, Project>,
    /// Next identifier to hand out, shared across all collections.
    pub(crate) next_id: u64,
}

impl EntityStore {
    /// Create an empty store whose first identifier is 1.
    pub const fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            twins: BTreeMap::new(),
            devices: BTreeMap::new(),
            templates: BTreeMap::new(),
            projects: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Take the next identifier from the shared counter.
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// The identifier the next `create_*` call will receive.
    pub const fn peek_next_id(&self) -> u64 {
        self.next_id
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Look up a user by id.
    pub fn get_user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).cloned()
    }

    /// Look up a user by exact username.
    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .values()
            .find(|user| user.username == username)
            .cloned()
    }

    /// All users in insertion order.
    pub fn list_users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the username or e-mail is
    /// already registered. The counter is not advanced in that case.
    pub fn create_user(&mut self, data: NewUser) -> Result<User, StoreError> {
        if self.users.values().any(|u| u.username == data.username) {
            return Err(StoreError::Conflict {
                field: "username",
                value: data.username,
            });
        }
        if self.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict {
                field: "email",
                value: data.email,
            });
        }

        let id = UserId::new(self.allocate_id());
        let user = User {
            id,
            username: data.username,
            password: data.password,
            email: data.email,
            role: data.role.unwrap_or_else(|| DEFAULT_ROLE.to_owned()),
            created_at: Utc::now(),
        };
        self.users.insert(id, user.clone());
        debug!(%id, username = %user.username, "user created");
        Ok(user)
    }

    // -----------------------------------------------------------------------
    // Digital twins
    // -----------------------------------------------------------------------

    /// List twins, optionally restricted to one owner.
    pub fn list_twins(&self, owner: Option<UserId>) -> Vec<DigitalTwin> {
        self.twins
            .values()
            .filter(|twin| owner.is_none_or(|owner| twin.user_id == Some(owner)))
            .cloned()
            .collect()
    }

    /// Look up a twin by id.
    pub fn get_twin(&self, id: TwinId) -> Option<DigitalTwin> {
        self.twins.get(&id).cloned()
    }

    /// Create a twin in [`TwinStatus::Processing`] with no model artifact.
    pub fn create_twin(&mut self, data: NewDigitalTwin) -> DigitalTwin {
        let id = TwinId::new(self.allocate_id());
        let now = Utc::now();
        let twin = DigitalTwin {
            id,
            name: data.name,
            description: data.description,
            twin_type: data.twin_type,
            user_id: data.user_id,
            status: TwinStatus::Processing,
            properties: data.properties,
            model_path: None,
            created_at: now,
            updated_at: now,
        };
        self.twins.insert(id, twin.clone());
        debug!(%id, twin_type = %twin.twin_type, "digital twin created");
        twin
    }

    /// Merge a partial update onto a twin.
    ///
    /// Returns `None`, leaving the store untouched, if the id is unknown.
    pub fn update_twin(&mut self, id: TwinId, update: TwinUpdate) -> Option<DigitalTwin> {
        let twin = self.twins.get_mut(&id)?;
        merge_twin(twin, update, Utc::now());
        Some(twin.clone())
    }

    // -----------------------------------------------------------------------
    // IoT devices
    // -----------------------------------------------------------------------

    /// List devices, optionally restricted to one twin.
    pub fn list_devices(&self, twin: Option<TwinId>) -> Vec<IotDevice> {
        self.devices
            .values()
            .filter(|device| twin.is_none_or(|twin| device.twin_id == Some(twin)))
            .cloned()
            .collect()
    }

    /// Look up a device by id.
    pub fn get_device(&self, id: DeviceId) -> Option<IotDevice> {
        self.devices.get(&id).cloned()
    }

    /// Register a device as connected with no observed value yet.
    pub fn create_device(&mut self, data: NewIotDevice) -> IotDevice {
        let id = DeviceId::new(self.allocate_id());
        let device = IotDevice {
            id,
            name: data.name,
            device_type: data.device_type,
            location: data.location,
            twin_id: data.twin_id,
            status: DeviceStatus::Connected,
            last_value: None,
            unit: data.unit,
            last_update: Utc::now(),
        };
        self.devices.insert(id, device.clone());
        debug!(%id, device_type = %device.device_type, "iot device created");
        device
    }

    /// Merge a partial update onto a device.
    ///
    /// Returns `None`, leaving the store untouched, if the id is unknown.
    pub fn update_device(&mut self, id: DeviceId, update: DeviceUpdate) -> Option<IotDevice> {
        let device = self.devices.get_mut(&id)?;
        merge_device(device, update, Utc::now());
        Some(device.clone())
    }

    // -----------------------------------------------------------------------
    // Workflow templates
    // -----------------------------------------------------------------------

    /// List templates, optionally restricted to one category (exact match).
    pub fn list_templates(&self, category: Option<&str>) -> Vec<WorkflowTemplate> {
        self.templates
            .values()
            .filter(|template| category.is_none_or(|category| template.category == category))
            .cloned()
            .collect()
    }

    /// Look up a template by id.
    pub fn get_template(&self, id: TemplateId) -> Option<WorkflowTemplate> {
        self.templates.get(&id).cloned()
    }

    /// Publish a template with no rating, downloads or image yet.
    pub fn create_template(&mut self, data: NewWorkflowTemplate) -> WorkflowTemplate {
        let id = TemplateId::new(self.allocate_id());
        let template = WorkflowTemplate {
            id,
            name: data.name,
            category: data.category,
            description: data.description,
            price: data.price,
            rating: 0.0,
            downloads: 0,
            image_path: None,
            template: data.template,
            created_at: Utc::now(),
        };
        self.templates.insert(id, template.clone());
        debug!(%id, category = %template.category, "workflow template created");
        template
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    /// List projects, optionally restricted to one owner.
    pub fn list_projects(&self, owner: Option<UserId>) -> Vec<Project> {
        self.projects
            .values()
            .filter(|project| owner.is_none_or(|owner| project.user_id == Some(owner)))
            .cloned()
            .collect()
    }

    /// Look up a project by id.
    pub fn get_project(&self, id: ProjectId) -> Option<Project> {
        self.projects.get(&id).cloned()
    }

    /// Create an active project at zero progress.
    pub fn create_project(&mut self, data: NewProject) -> Project {
        let id = ProjectId::new(self.allocate_id());
        let project = Project {
            id,
            name: data.name,
            project_type: data.project_type,
            user_id: data.user_id,
            twin_id: data.twin_id,
            progress: 0,
            status: DEFAULT_PROJECT_STATUS.to_owned(),
            last_updated: Utc::now(),
        };
        self.projects.insert(id, project.clone());
        debug!(%id, "project created");
        project
    }

    /// Merge a partial update onto a project.
    ///
    /// Returns `None`, leaving the store untouched, if the id is unknown.
    pub fn update_project(&mut self, id: ProjectId, update: ProjectUpdate) -> Option<Project> {
        let project = self.projects.get_mut(&id)?;
        merge_project(project, update, Utc::now());
        Some(project.clone())
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use twinforge_types::{DeviceType, TwinType};

    use super::*;

    fn new_twin(name: &str, owner: Option<UserId>) -> NewDigitalTwin {
        NewDigitalTwin {
            name: name.to_owned(),
            description: None,
            twin_type: TwinType::Architecture,
            user_id: owner,
            properties: None,
        }
    }

    #[test]
    fn new_store_is_empty() {
        let store = EntityStore::new();
        assert!(store.list_twins(None).is_empty());
        assert!(store.list_users().is_empty());
        assert_eq!(store.peek_next_id(), 1);
    }

    #[test]
    fn counter_is_shared_across_kinds() {
        let mut store = EntityStore::new();
        let twin = store.create_twin(new_twin("A", None));
        let device = store.create_device(NewIotDevice {
            name: "Temp".to_owned(),
            device_type: DeviceType::Temperature,
            location: "Roof".to_owned(),
            twin_id: Some(twin.id),
            unit: None,
        });
        let project = store.create_project(NewProject {
            name: "P".to_owned(),
            project_type: "Architecture".to_owned(),
            user_id: None,
            twin_id: Some(twin.id),
        });

        assert_eq!(twin.id.into_inner(), 1);
        assert_eq!(device.id.into_inner(), 2);
        assert_eq!(project.id.into_inner(), 3);
    }

    #[test]
    fn create_twin_defaults() {
        let mut store = EntityStore::new();
        let twin = store.create_twin(new_twin("A", Some(UserId::new(1))));
        assert_eq!(twin.status, TwinStatus::Processing);
        assert_eq!(twin.model_path, None);
        assert_eq!(twin.created_at, twin.updated_at);
    }

    #[test]
    fn duplicate_username_is_rejected_without_consuming_an_id() {
        let mut store = EntityStore::new();
        let first = NewUser {
            username: "ada".to_owned(),
            password: "pw".to_owned(),
            email: "ada@example.com".to_owned(),
            role: None,
        };
        let created = store.create_user(first.clone());
        assert!(created.is_ok());
        assert_eq!(created.map(|u| u.role).ok().as_deref(), Some(DEFAULT_ROLE));

        let again = store.create_user(NewUser {
            email: "other@example.com".to_owned(),
            ..first
        });
        assert!(matches!(again, Err(StoreError::Conflict { field: "username", .. })));
        assert_eq!(store.peek_next_id(), 2);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let mut store = EntityStore::new();
        let base = NewUser {
            username: "ada".to_owned(),
            password: "pw".to_owned(),
            email: "ada@example.com".to_owned(),
            role: Some("engineer".to_owned()),
        };
        assert!(store.create_user(base.clone()).is_ok());

        let clash = store.create_user(NewUser {
            username: "lovelace".to_owned(),
            ..base
        });
        assert!(matches!(clash, Err(StoreError::Conflict { field: "email", .. })));
    }

    #[test]
    fn find_user_by_username() {
        let mut store = EntityStore::new();
        let created = store.create_user(NewUser {
            username: "grace".to_owned(),
            password: "pw".to_owned(),
            email: "grace@example.com".to_owned(),
            role: None,
        });
        assert!(created.is_ok());
        assert!(store.find_user_by_username("grace").is_some());
        assert!(store.find_user_by_username("Grace").is_none());
    }

    #[test]
    fn update_unknown_id_leaves_store_unchanged() {
        let mut store = EntityStore::new();
        store.create_twin(new_twin("A", None));
        let before = store.list_twins(None);

        let result = store.update_twin(TwinId::new(999), TwinUpdate::default());

        assert!(result.is_none());
        assert_eq!(store.list_twins(None), before);
    }

    #[test]
    fn template_category_filter_is_exact() {
        let mut store = EntityStore::new();
        store.create_template(NewWorkflowTemplate {
            name: "Office".to_owned(),
            category: "Architecture".to_owned(),
            description: None,
            price: 0.0,
            template: None,
        });
        assert_eq!(store.list_templates(Some("Architecture")).len(), 1);
        assert!(store.list_templates(Some("architecture")).is_empty());
        assert_eq!(store.list_templates(None).len(), 1);
    }
}
