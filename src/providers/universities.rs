use serde::Serialize;
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::models::university::{
    search_universities, Faculty, FacultyCreate, Major, MajorCreate, University,
    UniversityCreate, UniversityListItem, UniversityUpdate,
};
use crate::providers::store::{ProviderState, Store};
use crate::services::UniversityService;
use crate::validation::{collect_errors, validate_institution_name, validate_university_form};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UniversityState {
    pub items: Vec<UniversityListItem>,
    pub selected: Option<University>,
}

#[derive(Clone)]
pub struct UniversityProvider {
    service: UniversityService,
    store: Store<UniversityState>,
}

impl UniversityProvider {
    pub fn new(api: ApiClient) -> Self {
        Self {
            service: UniversityService::new(api),
            store: Store::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProviderState<UniversityState>> {
        self.store.subscribe()
    }

    pub fn state(&self) -> ProviderState<UniversityState> {
        self.store.snapshot()
    }

    pub fn search(&self, query: &str) -> Vec<UniversityListItem> {
        self.store.read(|state| {
            search_universities(&state.items, query)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    pub async fn load(&self) -> Result<(), String> {
        self.store.start_loading();
        let response = self.service.list().await;
        self.store
            .settle(response, |state, items| state.items = items.clone())
            .map(|_| ())
    }

    pub async fn select(&self, id: &str) -> Result<University, String> {
        self.store.start_loading();
        let response = self.service.get(id).await;
        self.store
            .settle(response, |state, university| state.selected = Some(university.clone()))
    }

    pub async fn create(&self, university: UniversityCreate) -> Result<University, String> {
        self.store
            .check_form(validate_university_form(&university))?;
        self.store.start_loading();
        let response = self.service.create(&university).await;
        self.store.settle(response, |state, created| {
            state.items.push(created.to_list_item());
        })
    }

    pub async fn update(&self, id: &str, update: UniversityUpdate) -> Result<University, String> {
        if let Some(name) = update.name.as_deref() {
            self.store.check_form(collect_errors([validate_institution_name(
                "name",
                "Nama universitas",
                name,
            )]))?;
        }
        self.store.start_loading();
        let response = self.service.update(id, &update).await;
        self.store.settle(response, |state, updated| {
            if let Some(slot) = state.items.iter_mut().find(|u| u.id == updated.id) {
                *slot = updated.to_list_item();
            }
            if state.selected.as_ref().is_some_and(|s| s.id == updated.id) {
                state.selected = Some(updated.clone());
            }
        })
    }

    pub async fn delete(&self, id: &str) -> Result<(), String> {
        self.store.start_loading();
        let response = self.service.delete(id).await;
        self.store.settle(response, |state, _| {
            state.items.retain(|u| u.id != id);
            if state.selected.as_ref().is_some_and(|s| s.id == id) {
                state.selected = None;
            }
        })
    }

    pub async fn add_faculty(
        &self,
        university_id: &str,
        faculty: FacultyCreate,
    ) -> Result<Faculty, String> {
        self.store.check_form(collect_errors([validate_institution_name(
            "name",
            "Nama fakultas",
            &faculty.name,
        )]))?;
        self.store.start_loading();
        let response = self.service.add_faculty(university_id, &faculty).await;
        self.store.settle(response, |state, created| {
            if let Some(selected) = state.selected.as_mut().filter(|u| u.id == university_id) {
                selected.faculties.push(created.clone());
            }
            if let Some(item) = state.items.iter_mut().find(|u| u.id == university_id) {
                item.faculty_count += 1;
                item.major_count += created.majors.len() as u32;
            }
        })
    }

    pub async fn add_major(&self, faculty_id: &str, major: MajorCreate) -> Result<Major, String> {
        self.store.check_form(collect_errors([validate_institution_name(
            "name",
            "Nama jurusan",
            &major.name,
        )]))?;
        self.store.start_loading();
        let response = self.service.add_major(faculty_id, &major).await;
        self.store.settle(response, |state, created| {
            let Some(selected) = state.selected.as_mut() else {
                return;
            };
            let university_id = selected.id.clone();
            if let Some(faculty) = selected.faculties.iter_mut().find(|f| f.id == faculty_id) {
                faculty.majors.push(created.clone());
                if let Some(item) = state.items.iter_mut().find(|u| u.id == university_id) {
                    item.major_count += 1;
                }
            }
        })
    }
}
