//! Group management, reserved for staff.

use std::sync::Arc;

use crate::domain::Group;
use crate::error::DomainError;
use crate::ports::GroupRepository;

pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn create_group(
        &self,
        title: &str,
        slug: &str,
        description: &str,
    ) -> Result<Group, DomainError> {
        let group = Group::new(title, slug, description)?;

        if self.groups.find_by_slug(&group.slug).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "group with slug '{}' already exists",
                group.slug
            )));
        }

        let group = self.groups.insert(group).await?;
        tracing::info!(group_id = %group.id, slug = %group.slug, "Group created");
        Ok(group)
    }

    /// Remove a group. Its posts stay and lose their group.
    pub async fn delete_group(&self, slug: &str) -> Result<(), DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Group", slug))?;

        self.groups.delete(group.id).await?;
        tracing::info!(group_id = %group.id, slug = %slug, "Group deleted");
        Ok(())
    }
}
