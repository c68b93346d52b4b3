// which of the two sites the script is running on
//
// read from <body data-page="...">; anything unrecognised is treated as the portfolio
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PageKind {
    #[default]
    Portfolio,
    Resume,
}

impl From<Option<&str>> for PageKind {
    fn from(value: Option<&str>) -> PageKind {
        match value.map(str::trim) {
            Some("resume") | Some("cv") => PageKind::Resume,
            _ => PageKind::Portfolio,
        }
    }
}

impl PageKind {
    pub fn has_project_filter(self) -> bool {
        self == PageKind::Portfolio
    }

    pub fn has_skill_bars(self) -> bool {
        self == PageKind::Portfolio
    }

    pub fn has_contact_form(self) -> bool {
        self == PageKind::Portfolio
    }

    pub fn has_print_mode(self) -> bool {
        self == PageKind::Resume
    }

    pub fn has_last_updated(self) -> bool {
        self == PageKind::Resume
    }

    // the portfolio cycles through phrases, the resume reveals its text once
    pub fn cycles_typing(self) -> bool {
        self == PageKind::Portfolio
    }
}
