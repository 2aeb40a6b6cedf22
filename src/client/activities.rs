use tracing::info;

use super::{ApiClient, Method};
use crate::errors::Result;
use crate::models::{Activity, StudentActivity};

impl ApiClient {
    pub async fn get_activity(&self, activity_id: i64) -> Result<Option<Activity>> {
        self.get_optional(format!("activities/{activity_id}")).await
    }

    pub async fn course_activities(&self, course_id: i64) -> Result<Vec<Activity>> {
        self.get_json(format!("activities/course/{course_id}")).await
    }

    /// 学生可见的活动，每项带有该学生的当前提交
    pub async fn student_activities(&self, student_id: i64) -> Result<Vec<StudentActivity>> {
        self.get_json(format!("activities/student/{student_id}")).await
    }

    pub async fn publish_activity(&self, activity_id: i64) -> Result<()> {
        self.send_empty(Method::Put, format!("activities/{activity_id}/publish"))
            .await?;
        info!("Activity {} published", activity_id);
        Ok(())
    }

    pub async fn unpublish_activity(&self, activity_id: i64) -> Result<()> {
        self.send_empty(Method::Put, format!("activities/{activity_id}/unpublish"))
            .await?;
        info!("Activity {} unpublished", activity_id);
        Ok(())
    }

    pub async fn delete_activity(&self, activity_id: i64) -> Result<()> {
        self.send_empty(Method::Delete, format!("activities/{activity_id}"))
            .await?;
        info!("Activity {} deleted", activity_id);
        Ok(())
    }
}
