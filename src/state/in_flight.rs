// ============================================================================
// IN-FLIGHT LOADS - Peticiones en curso por capa
// ============================================================================
// Guarda el handle de cancelación (AbortController en web) de la carga
// vigente de cada capa, junto con la generación de su ticket. Una carga que
// termina solo libera su propio handle, nunca el de una carga posterior.
// ============================================================================

use std::collections::HashMap;

use crate::state::LoadTicket;

pub struct InFlightLoads<H> {
    entries: HashMap<String, (u64, H)>,
}

impl<H> Default for InFlightLoads<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> InFlightLoads<H> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registrar la carga del ticket. Devuelve el handle anterior de la capa
    /// (si había) para cancelarlo.
    pub fn start(&mut self, ticket: &LoadTicket, handle: H) -> Option<H> {
        self.entries
            .insert(ticket.layer.clone(), (ticket.generation, handle))
            .map(|(_, previous)| previous)
    }

    /// Carga terminada: quitar su handle solo si sigue siendo el vigente
    pub fn finish(&mut self, ticket: &LoadTicket) -> Option<H> {
        let is_ours = self
            .entries
            .get(&ticket.layer)
            .map(|(generation, _)| *generation == ticket.generation)
            .unwrap_or(false);
        if is_ours {
            self.entries.remove(&ticket.layer).map(|(_, handle)| handle)
        } else {
            None
        }
    }

    /// Capa desactivada: quitar el handle vigente para cancelarlo
    pub fn cancel(&mut self, layer: &str) -> Option<H> {
        self.entries.remove(layer).map(|(_, handle)| handle)
    }

    /// Todas las cargas en curso (desmontaje de la vista)
    pub fn drain(&mut self) -> Vec<(String, H)> {
        self.entries
            .drain()
            .map(|(layer, (_, handle))| (layer, handle))
            .collect()
    }
}
