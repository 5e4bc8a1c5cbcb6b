// Renderizador de pruebas: guarda las llamadas y el contenido de cada grupo
// en memoria para poder verificar la lógica de la sesión sin navegador.

use geojson::GeoJson;

use super::traits::{MapError, MapRenderer};
use crate::models::{feature_count, BoundaryStyle};
use crate::viewmodels::marker_viewmodel::MapMarker;

#[derive(Debug, Clone, PartialEq)]
pub enum RendererCall {
    CreateGroup(String),
    Attach(usize),
    Detach(usize),
    Clear(usize),
    AddMarker(usize),
    AddBoundary { features: usize, style: BoundaryStyle },
    Dispose,
}

#[derive(Debug, Default)]
struct FakeGroup {
    attached: bool,
    markers: Vec<MapMarker>,
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    groups: Vec<FakeGroup>,
    calls: Vec<RendererCall>,
    disposed: bool,
    fail_groups: bool,
}

impl RecordingRenderer {
    /// Renderizador que no puede crear grupos
    pub fn failing_groups() -> Self {
        Self {
            fail_groups: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> &[RendererCall] {
        &self.calls
    }

    pub fn created_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn attach_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RendererCall::Attach(_)))
            .count()
    }

    pub fn is_attached(&self, group: usize) -> bool {
        self.groups.get(group).map(|g| g.attached).unwrap_or(false)
    }

    pub fn markers_in(&self, group: usize) -> Vec<MapMarker> {
        self.groups
            .get(group)
            .map(|g| g.markers.clone())
            .unwrap_or_default()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn group_mut(&mut self, group: usize) -> Result<&mut FakeGroup, MapError> {
        if self.disposed {
            return Err(MapError::Disposed);
        }
        self.groups.get_mut(group).ok_or(MapError::NotReady)
    }
}

impl MapRenderer for RecordingRenderer {
    type Group = usize;

    fn create_marker_group(&mut self, layer: &str) -> Result<usize, MapError> {
        if self.fail_groups {
            return Err(MapError::Js(format!("layerGroup failed for {}", layer)));
        }
        self.calls.push(RendererCall::CreateGroup(layer.to_string()));
        self.groups.push(FakeGroup::default());
        Ok(self.groups.len() - 1)
    }

    fn attach_group(&mut self, group: &usize) -> Result<(), MapError> {
        self.group_mut(*group)?.attached = true;
        self.calls.push(RendererCall::Attach(*group));
        Ok(())
    }

    fn detach_group(&mut self, group: &usize) -> Result<(), MapError> {
        self.group_mut(*group)?.attached = false;
        self.calls.push(RendererCall::Detach(*group));
        Ok(())
    }

    fn clear_group(&mut self, group: &usize) -> Result<(), MapError> {
        self.group_mut(*group)?.markers.clear();
        self.calls.push(RendererCall::Clear(*group));
        Ok(())
    }

    fn add_marker(&mut self, group: &usize, marker: &MapMarker) -> Result<(), MapError> {
        self.group_mut(*group)?.markers.push(marker.clone());
        self.calls.push(RendererCall::AddMarker(*group));
        Ok(())
    }

    fn add_boundary_overlay(&mut self, data: &GeoJson, style: &BoundaryStyle) -> Result<(), MapError> {
        if self.disposed {
            return Err(MapError::Disposed);
        }
        self.calls.push(RendererCall::AddBoundary {
            features: feature_count(data),
            style: style.clone(),
        });
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.calls.push(RendererCall::Dispose);
    }
}
