//! Portal markup locations, keyed by logical field.
//!
//! The portal's result table is addressed by absolute XPath. Every location the
//! session touches lives in [`Locators`] so a markup change is a config edit.
//! Row templates take `{tr}` (the table row: 0-based index + 2, after the
//! header) and `{row}` (the 0-based index, used by the icon row ids).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical element of the portal page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UsernameField,
    PasswordField,
    LoginSubmit,
    SavedSearchesMenu,
    SavedQuery,
    SearchStartDate,
    ExecuteSearch,
    CallCount,
    RowInmateName(usize),
    RowCallDateTime(usize),
    RowListenedIcon(usize),
    RowDownloadLink(usize),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::UsernameField => write!(f, "username_field"),
            Field::PasswordField => write!(f, "password_field"),
            Field::LoginSubmit => write!(f, "login_submit"),
            Field::SavedSearchesMenu => write!(f, "saved_searches_menu"),
            Field::SavedQuery => write!(f, "saved_query"),
            Field::SearchStartDate => write!(f, "search_start_date"),
            Field::ExecuteSearch => write!(f, "execute_search"),
            Field::CallCount => write!(f, "call_count"),
            Field::RowInmateName(i) => write!(f, "row_inmate_name({})", i),
            Field::RowCallDateTime(i) => write!(f, "row_call_datetime({})", i),
            Field::RowListenedIcon(i) => write!(f, "row_listened_icon({})", i),
            Field::RowDownloadLink(i) => write!(f, "row_download_link({})", i),
        }
    }
}

const RESULTS_TABLE: &str = "//*[@id=\"callDetailLookupFormId\"]/table/tbody/tr[2]/td/table/tbody/tr[4]/td";

/// XPath table for the portal (optional `[locators]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locators {
    pub username_field: String,
    pub password_field: String,
    pub login_submit: String,
    pub saved_searches_menu: String,
    pub saved_query: String,
    pub search_start_date: String,
    pub execute_search: String,
    pub call_count: String,
    pub row_inmate_name: String,
    pub row_call_datetime: String,
    pub row_listened_icon: String,
    pub row_download_link: String,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            username_field: "//*[@id=\"j_username\"]".to_string(),
            password_field: "//*[@id=\"j_password\"]".to_string(),
            login_submit: "/html/body/form[2]/table[2]/tbody/tr/td/table/tbody/tr/td[1]/table/tbody/tr[6]/td/div/input"
                .to_string(),
            saved_searches_menu: "//*[@id=\"callDetailLookupFormId\"]/table/tbody/tr[1]/td/a"
                .to_string(),
            saved_query: "//*[@id=\"contentDiv\"]/table/tbody/tr[2]/td/table/tbody/tr[3]/td/table/tbody/tr[2]/td/table/tbody/tr[2]/td[1]/a[2]"
                .to_string(),
            search_start_date: "//*[@id=\"startDate\"]".to_string(),
            execute_search: "//*[@id=\"criteriaSectionId\"]/table/tbody/tr[3]/td/input[1]"
                .to_string(),
            call_count: format!("{RESULTS_TABLE}/table[1]/tbody/tr/td[1]"),
            row_inmate_name: format!(
                "{RESULTS_TABLE}/table[2]/tbody/tr[1]/td/div/table/tbody/tr[{{tr}}]/td[10]"
            ),
            row_call_datetime: format!(
                "{RESULTS_TABLE}/table[2]/tbody/tr[1]/td/div/table/tbody/tr[{{tr}}]/td[5]"
            ),
            row_listened_icon: "/html/body/table[1]/tbody/tr[3]/td/div[2]/form[5]/table/tbody/tr[2]/td/table/tbody/tr[4]/td/table[2]/tbody/tr[1]/td/div/table/tbody/tr[{tr}]/td[1]/table/tbody/tr/td[2]/a[4]/img"
                .to_string(),
            row_download_link: "//*[@id=\"icon-row-{row}\"]/table/tbody/tr/td[2]/a[5]".to_string(),
        }
    }
}

impl Locators {
    /// Resolve the XPath for `field`.
    pub fn xpath(&self, field: Field) -> String {
        match field {
            Field::UsernameField => self.username_field.clone(),
            Field::PasswordField => self.password_field.clone(),
            Field::LoginSubmit => self.login_submit.clone(),
            Field::SavedSearchesMenu => self.saved_searches_menu.clone(),
            Field::SavedQuery => self.saved_query.clone(),
            Field::SearchStartDate => self.search_start_date.clone(),
            Field::ExecuteSearch => self.execute_search.clone(),
            Field::CallCount => self.call_count.clone(),
            Field::RowInmateName(i) => fill_row(&self.row_inmate_name, i),
            Field::RowCallDateTime(i) => fill_row(&self.row_call_datetime, i),
            Field::RowListenedIcon(i) => fill_row(&self.row_listened_icon, i),
            Field::RowDownloadLink(i) => fill_row(&self.row_download_link, i),
        }
    }
}

fn fill_row(template: &str, index: usize) -> String {
    template
        .replace("{tr}", &(index + 2).to_string())
        .replace("{row}", &index.to_string())
}
