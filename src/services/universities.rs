use crate::api::{resource_path, ApiClient, ApiResponse};
use crate::models::university::{
    Faculty, FacultyCreate, Major, MajorCreate, University, UniversityCreate, UniversityListItem,
    UniversityUpdate,
};

/// Public directory plus the admin management endpoints.
#[derive(Clone)]
pub struct UniversityService {
    api: ApiClient,
}

impl UniversityService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ApiResponse<Vec<UniversityListItem>> {
        self.api.get("/universities", &[]).await
    }

    pub async fn get(&self, id: &str) -> ApiResponse<University> {
        self.api.get(&resource_path(&["universities", id]), &[]).await
    }

    pub async fn create(&self, university: &UniversityCreate) -> ApiResponse<University> {
        self.api.post("/admin/universities", university).await
    }

    pub async fn update(&self, id: &str, update: &UniversityUpdate) -> ApiResponse<University> {
        self.api.put(&resource_path(&["admin", "universities", id]), update).await
    }

    pub async fn delete(&self, id: &str) -> ApiResponse<()> {
        self.api.delete(&resource_path(&["admin", "universities", id])).await
    }

    pub async fn add_faculty(
        &self,
        university_id: &str,
        faculty: &FacultyCreate,
    ) -> ApiResponse<Faculty> {
        let path = resource_path(&["admin", "universities", university_id, "faculties"]);
        self.api.post(&path, faculty).await
    }

    pub async fn add_major(&self, faculty_id: &str, major: &MajorCreate) -> ApiResponse<Major> {
        self.api
            .post(&resource_path(&["admin", "faculties", faculty_id, "majors"]), major)
            .await
    }
}
