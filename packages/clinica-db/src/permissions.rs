//! Permissões por perfil
//!
//! Cada tela tem um conjunto de ações (botões). A visibilidade de uma ação
//! depende apenas do perfil do usuário logado; um perfil desconhecido só pode
//! voltar.

use serde::{Deserialize, Serialize};

use crate::error::{ClinicaError, ClinicaResult};
use crate::models::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    MainMenu,
    Patients,
    Doctors,
    Appointments,
    Reports,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    OpenPatients,
    OpenDoctors,
    OpenAppointments,
    OpenReports,
    Save,
    Edit,
    Remove,
    Clear,
    Back,
    EditStatus,
    GenerateReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Enabled,
    /// Visível mas sem efeito
    Disabled,
    Hidden,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::MainMenu,
        Screen::Patients,
        Screen::Doctors,
        Screen::Appointments,
        Screen::Reports,
    ];

    pub fn actions(&self) -> &'static [Action] {
        match self {
            Screen::MainMenu => &[
                Action::OpenPatients,
                Action::OpenDoctors,
                Action::OpenAppointments,
                Action::OpenReports,
            ],
            Screen::Patients | Screen::Doctors | Screen::Appointments => &[
                Action::Save,
                Action::Edit,
                Action::Remove,
                Action::Clear,
                Action::Back,
            ],
            Screen::Reports => &[
                Action::EditStatus,
                Action::GenerateReport,
                Action::Remove,
                Action::Back,
            ],
        }
    }

    /// Botão do menu principal que abre esta tela
    pub fn opened_by(&self) -> Option<Action> {
        match self {
            Screen::MainMenu => None,
            Screen::Patients => Some(Action::OpenPatients),
            Screen::Doctors => Some(Action::OpenDoctors),
            Screen::Appointments => Some(Action::OpenAppointments),
            Screen::Reports => Some(Action::OpenReports),
        }
    }
}

pub fn visibility(profile: Option<Profile>, screen: Screen, action: Action) -> Visibility {
    use Visibility::*;

    if !screen.actions().contains(&action) {
        return Hidden;
    }

    let Some(profile) = profile else {
        return if action == Action::Back { Enabled } else { Hidden };
    };

    match (screen, profile) {
        (_, Profile::Admin) => Enabled,
        (Screen::MainMenu, Profile::Receptionist) => Enabled,
        (Screen::MainMenu, Profile::Doctor) => match action {
            Action::OpenReports => Enabled,
            _ => Disabled,
        },
        (Screen::Reports, _) => match action {
            Action::Remove => Hidden,
            _ => Enabled,
        },
        (_, Profile::Receptionist) => match action {
            Action::Remove => Hidden,
            _ => Enabled,
        },
        (_, Profile::Doctor) => match action {
            Action::Back => Enabled,
            _ => Hidden,
        },
    }
}

/// Falha com `PermissionDenied` se a ação não estiver habilitada
pub fn ensure_enabled(profile: Option<Profile>, screen: Screen, action: Action) -> ClinicaResult<()> {
    match visibility(profile, screen, action) {
        Visibility::Enabled => Ok(()),
        _ => Err(ClinicaError::PermissionDenied(format!(
            "Ação {:?} indisponível na tela {:?} para o perfil {}",
            action,
            screen,
            profile.map(|p| p.as_str()).unwrap_or("desconhecido")
        ))),
    }
}

/// Uma tela só pode ser aberta se o botão do menu principal estiver habilitado
pub fn ensure_can_open(profile: Option<Profile>, screen: Screen) -> ClinicaResult<()> {
    match screen.opened_by() {
        Some(action) => ensure_enabled(profile, Screen::MainMenu, action),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub screen: Screen,
    pub action: Action,
    pub visibility: Visibility,
}

/// Tabela completa de permissões de um perfil, tela a tela
pub fn permission_table(profile: Option<Profile>) -> Vec<PermissionEntry> {
    Screen::ALL
        .iter()
        .flat_map(|screen| {
            screen.actions().iter().map(move |action| PermissionEntry {
                screen: *screen,
                action: *action,
                visibility: visibility(profile, *screen, *action),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRIES: [Screen; 3] = [Screen::Patients, Screen::Doctors, Screen::Appointments];

    #[test]
    fn test_admin_has_everything() {
        assert!(permission_table(Some(Profile::Admin))
            .iter()
            .all(|entry| entry.visibility == Visibility::Enabled));
    }

    #[test]
    fn test_receptionist_cannot_remove() {
        let recep = Some(Profile::Receptionist);
        for screen in REGISTRIES.into_iter().chain([Screen::Reports]) {
            assert_eq!(visibility(recep, screen, Action::Remove), Visibility::Hidden);
        }
        for screen in REGISTRIES {
            assert_eq!(visibility(recep, screen, Action::Edit), Visibility::Enabled);
            assert_eq!(visibility(recep, screen, Action::Save), Visibility::Enabled);
        }
        assert_eq!(visibility(recep, Screen::MainMenu, Action::OpenPatients), Visibility::Enabled);
    }

    #[test]
    fn test_doctor_only_views() {
        let doctor = Some(Profile::Doctor);
        for screen in REGISTRIES {
            for action in [Action::Save, Action::Edit, Action::Remove, Action::Clear] {
                assert_eq!(visibility(doctor, screen, action), Visibility::Hidden);
            }
            assert_eq!(visibility(doctor, screen, Action::Back), Visibility::Enabled);
        }
        assert_eq!(visibility(doctor, Screen::MainMenu, Action::OpenPatients), Visibility::Disabled);
        assert_eq!(visibility(doctor, Screen::MainMenu, Action::OpenAppointments), Visibility::Disabled);
        assert_eq!(visibility(doctor, Screen::MainMenu, Action::OpenReports), Visibility::Enabled);
        assert_eq!(visibility(doctor, Screen::Reports, Action::EditStatus), Visibility::Enabled);
        assert_eq!(visibility(doctor, Screen::Reports, Action::Remove), Visibility::Hidden);
    }

    #[test]
    fn test_unknown_profile_can_only_go_back() {
        for entry in permission_table(None) {
            let expected = if entry.action == Action::Back {
                Visibility::Enabled
            } else {
                Visibility::Hidden
            };
            assert_eq!(entry.visibility, expected, "{:?}", entry);
        }
    }

    #[test]
    fn test_action_outside_screen_is_hidden() {
        assert_eq!(
            visibility(Some(Profile::Admin), Screen::MainMenu, Action::Remove),
            Visibility::Hidden
        );
    }

    #[test]
    fn test_ensure_helpers() {
        assert!(ensure_enabled(Some(Profile::Admin), Screen::Patients, Action::Remove).is_ok());
        assert!(matches!(
            ensure_enabled(Some(Profile::Receptionist), Screen::Patients, Action::Remove),
            Err(ClinicaError::PermissionDenied(_))
        ));
        assert!(ensure_can_open(Some(Profile::Doctor), Screen::Reports).is_ok());
        assert!(ensure_can_open(Some(Profile::Doctor), Screen::Patients).is_err());
    }
}
