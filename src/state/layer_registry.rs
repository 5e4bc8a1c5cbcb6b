// ============================================================================
// LAYER REGISTRY - Grupos de marcadores por nombre de capa
// ============================================================================
// Un grupo se crea como máximo una vez por sesión y se reutiliza en cada
// activación. Cada carga lleva un número de generación: si la capa se
// desactiva (o se vuelve a cargar) antes de que llegue la respuesta, la
// generación cambia y la respuesta tardía se ignora.
// ============================================================================

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Comprobante de una carga en curso
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub layer: String,
    pub generation: u64,
}

#[derive(Debug)]
pub struct LayerEntry<G> {
    pub group: G,
    pub attached: bool,
    pub loading: bool,
    pub loaded: bool,
    generation: u64,
}

pub struct LayerRegistry<G> {
    entries: HashMap<String, LayerEntry<G>>,
}

impl<G> Default for LayerRegistry<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> LayerRegistry<G> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Obtener el grupo de la capa, creándolo si no existe.
    /// Devuelve `true` como segundo valor si se acaba de crear.
    pub fn ensure_group<E, F>(&mut self, layer: &str, create: F) -> Result<(&mut LayerEntry<G>, bool), E>
    where
        F: FnOnce() -> Result<G, E>,
    {
        match self.entries.entry(layer.to_string()) {
            Entry::Occupied(occupied) => Ok((occupied.into_mut(), false)),
            Entry::Vacant(vacant) => {
                let group = create()?;
                let entry = vacant.insert(LayerEntry {
                    group,
                    attached: false,
                    loading: false,
                    loaded: false,
                    generation: 0,
                });
                Ok((entry, true))
            }
        }
    }

    pub fn get(&self, layer: &str) -> Option<&LayerEntry<G>> {
        self.entries.get(layer)
    }

    pub fn is_attached(&self, layer: &str) -> bool {
        self.entries.get(layer).map(|e| e.attached).unwrap_or(false)
    }

    /// Iniciar una carga: invalida cualquier carga anterior de la misma capa
    pub fn begin_load(&mut self, layer: &str) -> Option<LoadTicket> {
        let entry = self.entries.get_mut(layer)?;
        entry.generation += 1;
        entry.loading = true;
        entry.loaded = false;
        Some(LoadTicket {
            layer: layer.to_string(),
            generation: entry.generation,
        })
    }

    /// La carga sigue vigente: capa visible y sin cargas posteriores
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.entries
            .get(&ticket.layer)
            .map(|e| e.attached && e.generation == ticket.generation)
            .unwrap_or(false)
    }

    pub fn finish_load(&mut self, ticket: &LoadTicket) {
        if let Some(entry) = self.entries.get_mut(&ticket.layer) {
            if entry.generation == ticket.generation {
                entry.loading = false;
                entry.loaded = true;
            }
        }
    }

    /// Carga fallida: la capa sigue sin datos
    pub fn abandon_load(&mut self, ticket: &LoadTicket) {
        if let Some(entry) = self.entries.get_mut(&ticket.layer) {
            if entry.generation == ticket.generation {
                entry.loading = false;
                entry.loaded = false;
            }
        }
    }

    /// Marcar la capa como oculta. Devuelve la entrada si estaba visible.
    pub fn detach(&mut self, layer: &str) -> Option<&mut LayerEntry<G>> {
        let entry = self.entries.get_mut(layer)?;
        if !entry.attached {
            return None;
        }
        entry.attached = false;
        if entry.loading {
            // la respuesta en vuelo ya no debe tocar el grupo
            entry.generation += 1;
            entry.loading = false;
        }
        Some(entry)
    }

    /// Vaciar el registro (desmontaje de la vista)
    pub fn drain(&mut self) -> Vec<(String, LayerEntry<G>)> {
        self.entries.drain().collect()
    }
}
