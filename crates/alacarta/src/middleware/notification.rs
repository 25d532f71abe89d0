//! Notification Middleware
//!
//! Turns reduced actions into entries of the notification log. Runs after the
//! reducer so messages can describe the resulting state, and so no-op edits
//! (unknown ids) produce no notification at all.

use std::sync::Arc;

use crate::actions::{
    Action, AuthAction, BackupAction, DeliveryZoneAction, NotificationAction, NovelAction,
    PricesAction, SyncAction,
};
use crate::dispatcher::Dispatcher;
use crate::middleware::{is_effective, Middleware};
use crate::stamp::{Clock, IdGenerator};
use crate::state::{AdminState, NotificationDraft, NotificationKind, Novel};

const SECTION_AUTH: &str = "Autenticación";
const SECTION_PRICES: &str = "Gestión de Precios";
const SECTION_ZONES: &str = "Zonas de Entrega";
const SECTION_NOVELS: &str = "Gestión de Novelas";
const SECTION_NOTIFICATIONS: &str = "Notificaciones";
const SECTION_SYSTEM: &str = "Sistema";

pub struct NotificationMiddleware {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl NotificationMiddleware {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Stamp a draft into an add action
    pub fn stamp(&self, draft: NotificationDraft) -> Action {
        Action::Notification(NotificationAction::Add(
            draft.stamp(self.ids.next_id().to_string(), self.clock.now()),
        ))
    }
}

fn novel_summary(novel: &Novel) -> String {
    format!(
        "\"{}\" ({}) - Género: {}, {} capítulos",
        novel.title, novel.year, novel.genre, novel.chapters
    )
}

/// Notification describing a reduced action, if it deserves one
fn describe(action: &Action, previous: &AdminState, state: &AdminState) -> Option<NotificationDraft> {
    use NotificationKind::*;

    let draft = match action {
        Action::Auth(AuthAction::LoginSucceeded { .. }) => NotificationDraft::new(
            Success,
            "Inicio de sesión exitoso",
            "Bienvenido al panel de administración",
            SECTION_AUTH,
            "login",
        ),
        Action::Auth(AuthAction::Logout) => NotificationDraft::new(
            Info,
            "Sesión cerrada",
            "Has cerrado sesión correctamente",
            SECTION_AUTH,
            "logout",
        ),

        Action::Prices(PricesAction::Update(prices)) => NotificationDraft::new(
            Success,
            "Precios actualizados exitosamente",
            format!(
                "Precios actualizados: Películas ${} CUP, Series ${} CUP/temporada, Transferencia {}%, Novelas ${} CUP/capítulo",
                prices.movie_price,
                prices.series_price,
                prices.transfer_fee_percentage,
                prices.novel_price_per_chapter
            ),
            SECTION_PRICES,
            "update",
        ),

        Action::DeliveryZone(DeliveryZoneAction::Add(zone)) => NotificationDraft::new(
            Success,
            "Zona de entrega agregada exitosamente",
            format!(
                "Nueva zona de entrega agregada: \"{}\" con costo de ${} CUP",
                zone.name, zone.cost
            ),
            SECTION_ZONES,
            "create",
        ),
        Action::DeliveryZone(DeliveryZoneAction::Update(zone)) => NotificationDraft::new(
            Success,
            "Zona de entrega actualizada exitosamente",
            format!(
                "Zona de entrega actualizada: \"{}\" ahora tiene un costo de ${} CUP",
                zone.name, zone.cost
            ),
            SECTION_ZONES,
            "update",
        ),
        Action::DeliveryZone(DeliveryZoneAction::Delete(id)) => {
            let name = previous
                .find_delivery_zone(*id)
                .map_or("Desconocida", |zone| zone.name.as_str());
            NotificationDraft::new(
                Warning,
                "Zona de entrega eliminada",
                format!("Zona de entrega eliminada: \"{}\"", name),
                SECTION_ZONES,
                "delete",
            )
        }

        Action::Novel(NovelAction::Add(novel)) => NotificationDraft::new(
            Success,
            "Novela agregada exitosamente",
            format!(
                "Nueva novela agregada al catálogo: {}. Costo calculado: ${} CUP",
                novel_summary(novel),
                state.prices.novel_cost(novel.chapters)
            ),
            SECTION_NOVELS,
            "create",
        ),
        Action::Novel(NovelAction::Update(novel)) => NotificationDraft::new(
            Success,
            "Novela actualizada exitosamente",
            format!(
                "Novela actualizada: {}. Nuevo costo calculado: ${} CUP",
                novel_summary(novel),
                state.prices.novel_cost(novel.chapters)
            ),
            SECTION_NOVELS,
            "update",
        ),
        Action::Novel(NovelAction::Delete(id)) => {
            let message = match previous.find_novel(*id) {
                Some(novel) => format!("Novela eliminada: {}", novel_summary(novel)),
                None => "Novela eliminada: \"Desconocida\"".to_string(),
            };
            NotificationDraft::new(
                Warning,
                "Novela eliminada del catálogo",
                message,
                SECTION_NOVELS,
                "delete",
            )
        }

        Action::Notification(NotificationAction::Clear) => NotificationDraft::new(
            Info,
            "Notificaciones limpiadas",
            "Se han eliminado todas las notificaciones del sistema",
            SECTION_NOTIFICATIONS,
            "clear",
        ),

        Action::Sync(SyncAction::RemoteCompleted { .. }) => NotificationDraft::new(
            Success,
            "Sincronización completada exitosamente",
            "Todos los datos del sistema se han sincronizado correctamente",
            SECTION_SYSTEM,
            "sync",
        ),
        Action::Sync(SyncAction::RemoteFailed { reason }) => NotificationDraft::new(
            Error,
            "Error de sincronización",
            format!(
                "No se pudo sincronizar con el servidor remoto ({}). Verifique la conexión e intente nuevamente",
                reason
            ),
            SECTION_SYSTEM,
            "sync_error",
        ),

        Action::Backup(BackupAction::Started) => NotificationDraft::new(
            Info,
            "Iniciando exportación del sistema",
            "Preparando la exportación completa del sistema con todas las configuraciones actuales",
            SECTION_SYSTEM,
            "export_start",
        ),
        Action::Backup(BackupAction::Exported { path, .. }) => NotificationDraft::new(
            Success,
            "Sistema exportado exitosamente",
            format!(
                "Exportación completa: {} zonas, {} novelas. Archivo: {}",
                state.delivery_zones.len(),
                state.novels.len(),
                path.display()
            ),
            SECTION_SYSTEM,
            "export",
        ),
        Action::Backup(BackupAction::Failed { reason }) => NotificationDraft::new(
            Error,
            "Error al exportar el sistema",
            format!("No se pudo completar la exportación: {}", reason),
            SECTION_SYSTEM,
            "export_error",
        ),
        Action::Backup(BackupAction::Restored { path, .. }) => NotificationDraft::new(
            Success,
            "Sistema restaurado",
            format!(
                "Configuración restaurada desde {}: {} zonas, {} novelas",
                path.display(),
                state.delivery_zones.len(),
                state.novels.len()
            ),
            SECTION_SYSTEM,
            "import",
        ),
        Action::Backup(BackupAction::RestoreFailed { reason }) => NotificationDraft::new(
            Error,
            "Error al restaurar el sistema",
            format!("No se pudo leer el archivo de exportación: {}", reason),
            SECTION_SYSTEM,
            "import_error",
        ),

        _ => return None,
    };
    Some(draft)
}

impl Middleware for NotificationMiddleware {
    fn handle(&mut self, _action: &Action, _state: &AdminState, _dispatcher: &Dispatcher) -> bool {
        true
    }

    fn after_reduce(
        &mut self,
        action: &Action,
        previous: &AdminState,
        state: &AdminState,
        dispatcher: &Dispatcher,
    ) {
        if !is_effective(action, previous) {
            return;
        }
        if let Some(draft) = describe(action, previous, state) {
            dispatcher.dispatch(self.stamp(draft));
        }
    }
}
