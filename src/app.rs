use std::path::PathBuf;

use crate::auth::{AuthOutcome, Credentials};
use crate::dates;
use crate::records::{
    self, ExerciseEntry, KholleEntry, PlanningEntry, EXERCISE_COLUMNS, KHOLLE_COLUMNS,
    PLANNING_COLUMNS,
};
use crate::store::{LoadOutcome, TrackerData};

pub const TAB_TITLES: [&str; 3] = ["📅 Planning", "📝 Exercices", "🎓 Kholles"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
}

impl LoginForm {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

/// One editable tab: cells kept in display form (dates as dd/mm/yyyy),
/// converted to typed rows only when saving.
#[derive(Debug)]
pub struct Grid {
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
    pub row: usize,
    pub col: usize,
}

impl Grid {
    fn new(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            row: 0,
            col: 0,
        }
    }

    pub fn add_row(&mut self) {
        self.rows.push(vec![String::new(); self.columns.len()]);
        self.row = self.rows.len() - 1;
        self.col = 0;
    }

    pub fn delete_row(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.rows.remove(self.row);
        if self.row >= self.rows.len() && self.row > 0 {
            self.row -= 1;
        }
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        if self.rows.is_empty() {
            return;
        }
        let max_row = self.rows.len() as isize - 1;
        let max_col = self.columns.len() as isize - 1;
        self.row = (self.row as isize + d_row).clamp(0, max_row) as usize;
        self.col = (self.col as isize + d_col).clamp(0, max_col) as usize;
    }

    pub fn cell(&self) -> Option<&String> {
        self.rows.get(self.row).and_then(|r| r.get(self.col))
    }

    pub fn set_cell(&mut self, value: String) {
        if let Some(cell) = self
            .rows
            .get_mut(self.row)
            .and_then(|r| r.get_mut(self.col))
        {
            *cell = value;
        }
    }
}

/// Selectbox columns of the original dashboard: Space cycles through the
/// options instead of free-text entry.
pub fn options_for(tab: usize, col: usize) -> Option<&'static [&'static str]> {
    match (tab, col) {
        (0, 1) => Some(&records::PLANNING_SUBJECTS),
        (0, 2) => Some(&records::PLANNING_TYPES),
        (0, 4) => Some(&records::PLANNING_STATUSES),
        (1, 0) => Some(&records::EXERCISE_SUBJECTS),
        (1, 3) => Some(&records::EXERCISE_STATES),
        (2, 1) => Some(&records::KHOLLE_SUBJECTS),
        _ => None,
    }
}

fn display_cell(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}

pub fn grids_from(data: &TrackerData) -> [Grid; 3] {
    let mut planning = Grid::new(&PLANNING_COLUMNS);
    planning.rows = data
        .planning
        .iter()
        .map(|e| {
            vec![
                dates::to_display(e.date),
                e.subject.clone(),
                e.kind.clone(),
                e.description.clone(),
                e.status.clone(),
            ]
        })
        .collect();

    let mut exercices = Grid::new(&EXERCISE_COLUMNS);
    exercices.rows = data
        .exercices
        .iter()
        .map(|e| {
            vec![
                e.subject.clone(),
                e.chapter.clone(),
                e.reference.clone(),
                e.state.clone(),
            ]
        })
        .collect();

    let mut kholles = Grid::new(&KHOLLE_COLUMNS);
    kholles.rows = data
        .kholles
        .iter()
        .map(|e| vec![dates::to_display(e.date), e.subject.clone(), e.examiner.clone()])
        .collect();

    [planning, exercices, kholles]
}

/// Flattens the grids back to typed rows. Date cells are re-parsed leniently;
/// whatever does not parse becomes an absent date.
pub fn data_from(grids: &[Grid; 3]) -> TrackerData {
    TrackerData {
        planning: grids[0]
            .rows
            .iter()
            .map(|r| PlanningEntry {
                date: dates::parse_lenient(&display_cell(r, 0)),
                subject: display_cell(r, 1),
                kind: display_cell(r, 2),
                description: display_cell(r, 3),
                status: display_cell(r, 4),
            })
            .collect(),
        exercices: grids[1]
            .rows
            .iter()
            .map(|r| ExerciseEntry {
                subject: display_cell(r, 0),
                chapter: display_cell(r, 1),
                reference: display_cell(r, 2),
                state: display_cell(r, 3),
            })
            .collect(),
        kholles: grids[2]
            .rows
            .iter()
            .map(|r| KholleEntry {
                date: dates::parse_lenient(&display_cell(r, 0)),
                subject: display_cell(r, 1),
                examiner: display_cell(r, 2),
            })
            .collect(),
    }
}

pub struct App {
    pub screen: Screen,
    pub login: LoginForm,
    pub session: Option<Session>,
    pub credentials: Credentials,
    pub data_file: PathBuf,
    pub tab: usize,
    pub grids: [Grid; 3],
    pub editing: Option<String>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

impl App {
    pub fn new(credentials: Credentials, data_file: PathBuf) -> Self {
        Self {
            screen: Screen::Login,
            login: LoginForm::default(),
            session: None,
            credentials,
            data_file,
            tab: 0,
            grids: grids_from(&TrackerData::default()),
            editing: None,
            notice: None,
            dirty: false,
        }
    }

    pub fn submit_login(&mut self) {
        let username = self.login.username.trim().to_string();
        let outcome = match self.credentials.authenticate(&username, &self.login.password) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.notice = Some(Notice::Error(format!("Erreur : {err}")));
                return;
            }
        };
        match outcome {
            AuthOutcome::EmptyField => {
                self.notice = Some(Notice::Warning(
                    "Veuillez remplir tous les champs.".into(),
                ));
            }
            AuthOutcome::AccountCreated => {
                self.notice = Some(Notice::Info(
                    "Compte créé ! Connectez-vous maintenant.".into(),
                ));
                self.login.password.clear();
            }
            AuthOutcome::WrongPassword => {
                self.notice = Some(Notice::Error("Mot de passe incorrect.".into()));
                self.login.password.clear();
            }
            AuthOutcome::LoggedIn => {
                self.session = Some(Session { username });
                self.login.password.clear();
                self.load_records();
                self.screen = Screen::Dashboard;
                self.notice = Some(Notice::Info("Connexion réussie !".into()));
            }
        }
    }

    pub fn load_records(&mut self) {
        let (data, outcome) = TrackerData::load(&self.data_file);
        if let LoadOutcome::Malformed(reason) = &outcome {
            self.notice = Some(Notice::Warning(format!(
                "Fichier de données illisible ({reason}), listes vides chargées."
            )));
        }
        self.grids = grids_from(&data);
        self.tab = 0;
        self.dirty = false;
    }

    pub fn save_records(&mut self) {
        let data = data_from(&self.grids);
        match data.save(&self.data_file) {
            Ok(()) => {
                // Re-normalize so edited date cells show their parsed form.
                let (row, col, tab) = (self.grids[self.tab].row, self.grids[self.tab].col, self.tab);
                self.grids = grids_from(&data);
                self.tab = tab;
                self.grids[tab].row = row.min(self.grids[tab].rows.len().saturating_sub(1));
                self.grids[tab].col = col;
                self.dirty = false;
                self.notice = Some(Notice::Info("Données sauvegardées avec succès !".into()));
            }
            Err(err) => {
                self.notice = Some(Notice::Error(format!("Erreur de sauvegarde : {err}")));
            }
        }
    }

    pub fn logout(&mut self) {
        self.screen = Screen::Login;
        self.session = None;
        self.login = LoginForm::default();
        self.grids = grids_from(&TrackerData::default());
        self.editing = None;
        self.notice = None;
        self.dirty = false;
    }

    pub fn grid(&self) -> &Grid {
        &self.grids[self.tab]
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grids[self.tab]
    }

    pub fn next_tab(&mut self) {
        self.tab = (self.tab + 1) % self.grids.len();
    }

    pub fn prev_tab(&mut self) {
        self.tab = (self.tab + self.grids.len() - 1) % self.grids.len();
    }

    pub fn add_row(&mut self) {
        self.grid_mut().add_row();
        self.dirty = true;
    }

    pub fn delete_row(&mut self) {
        if !self.grid().rows.is_empty() {
            self.grid_mut().delete_row();
            self.dirty = true;
        }
    }

    pub fn start_edit(&mut self) {
        if let Some(cell) = self.grid().cell() {
            self.editing = Some(cell.clone());
        }
    }

    pub fn edit_push(&mut self, c: char) {
        if let Some(buffer) = self.editing.as_mut() {
            buffer.push(c);
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(buffer) = self.editing.as_mut() {
            buffer.pop();
        }
    }

    pub fn commit_edit(&mut self) {
        if let Some(buffer) = self.editing.take() {
            self.grid_mut().set_cell(buffer);
            self.dirty = true;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn cycle_cell(&mut self) {
        let (tab, col) = (self.tab, self.grid().col);
        let Some(options) = options_for(tab, col) else {
            return;
        };
        let Some(current) = self.grid().cell().cloned() else {
            return;
        };
        let next = match options.iter().position(|o| *o == current) {
            Some(idx) => options[(idx + 1) % options.len()],
            None => options[0],
        };
        self.grid_mut().set_cell(next.to_string());
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn app_in(dir: &std::path::Path) -> App {
        let credentials = Credentials::load(dir.join("users.json"));
        App::new(credentials, dir.join("mpsi_data.json"))
    }

    #[test]
    fn grid_round_trip_keeps_values_and_display_dates() {
        let data = TrackerData {
            planning: vec![PlanningEntry {
                date: NaiveDate::from_ymd_opt(2024, 5, 12),
                subject: "Maths".into(),
                kind: "DS".into(),
                description: "Suites".into(),
                status: "À venir".into(),
            }],
            exercices: vec![],
            kholles: vec![KholleEntry {
                date: None,
                subject: "Info".into(),
                examiner: "M. Dupont".into(),
            }],
        };
        let grids = grids_from(&data);
        assert_eq!(grids[0].rows[0][0], "12/05/2024");
        assert_eq!(grids[2].rows[0][0], "");
        assert_eq!(data_from(&grids), data);
    }

    #[test]
    fn edited_date_cell_is_reparsed_on_flatten() {
        let mut grids = grids_from(&TrackerData::default());
        grids[2].add_row();
        grids[2].rows[0][0] = "03/11/2025".into();
        grids[2].rows[0][1] = "Anglais".into();
        let data = data_from(&grids);
        assert_eq!(data.kholles[0].date, NaiveDate::from_ymd_opt(2025, 11, 3));

        grids[2].rows[0][0] = "n'importe quoi".into();
        assert_eq!(data_from(&grids).kholles[0].date, None);
    }

    #[test]
    fn login_flow_empty_then_create_then_login() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());

        app.submit_login();
        assert_eq!(app.screen, Screen::Login);
        assert!(matches!(app.notice, Some(Notice::Warning(_))));

        app.login.username = "yazid".into();
        app.login.password = "mpsi2024".into();
        app.submit_login();
        assert_eq!(app.screen, Screen::Login);
        assert!(matches!(app.notice, Some(Notice::Info(_))));
        assert!(app.login.password.is_empty());

        app.login.password = "mpsi2024".into();
        app.submit_login();
        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.session.as_ref().unwrap().username, "yazid");
    }

    #[test]
    fn wrong_password_stays_on_login() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.login.username = "yazid".into();
        app.login.password = "mpsi2024".into();
        app.submit_login(); // creates the account
        app.login.password = "oops".into();
        app.submit_login();
        assert_eq!(app.screen, Screen::Login);
        assert!(matches!(app.notice, Some(Notice::Error(_))));
    }

    #[test]
    fn editing_marks_dirty_and_save_clears_it() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());
        assert!(!app.dirty);

        app.add_row();
        assert!(app.dirty);
        app.start_edit();
        app.edit_push('D');
        app.edit_push('M');
        app.commit_edit();
        assert_eq!(app.grid().rows[0][0], "DM");

        app.save_records();
        assert!(!app.dirty);
        assert!(matches!(app.notice, Some(Notice::Info(_))));
        assert!(app.data_file.exists());
    }

    #[test]
    fn cancel_edit_keeps_the_cell() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.add_row();
        app.dirty = false;
        app.start_edit();
        app.edit_push('x');
        app.cancel_edit();
        assert_eq!(app.grid().rows[0][0], "");
        assert!(!app.dirty);
    }

    #[test]
    fn cycle_walks_the_option_list() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.tab = 1; // exercices: col 0 is Matière
        app.add_row();
        app.cycle_cell();
        assert_eq!(app.grid().rows[0][0], "Maths");
        app.cycle_cell();
        assert_eq!(app.grid().rows[0][0], "Physique");

        // free-text columns do not cycle
        app.grid_mut().col = 1;
        app.cycle_cell();
        assert_eq!(app.grid().rows[0][1], "");
    }

    #[test]
    fn delete_row_clamps_the_cursor() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.add_row();
        app.add_row();
        assert_eq!(app.grid().row, 1);
        app.delete_row();
        assert_eq!(app.grid().rows.len(), 1);
        assert_eq!(app.grid().row, 0);
        app.delete_row();
        assert!(app.grid().rows.is_empty());
        app.delete_row(); // no-op on an empty grid
    }

    #[test]
    fn logout_returns_to_a_clean_login() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.login.username = "yazid".into();
        app.login.password = "mpsi2024".into();
        app.submit_login();
        app.login.password = "mpsi2024".into();
        app.submit_login();
        assert_eq!(app.screen, Screen::Dashboard);

        app.logout();
        assert_eq!(app.screen, Screen::Login);
        assert!(app.session.is_none());
        assert!(app.login.username.is_empty());
    }
}
