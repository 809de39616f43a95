use serde::Serialize;

use crate::session::{Role, SessionStore};

/// Where an unauthenticated visitor is sent.
pub const ENTRY_POINT: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "decision", content = "redirectTo")]
pub enum Decision {
    Allow,
    Redirect(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub title: &'static str,
    pub route: &'static str,
}

const STUDENT_MENU: &[MenuItem] = &[
    MenuItem {
        title: "Student Dashboard",
        route: "/dashboard",
    },
    MenuItem {
        title: "Exam Center",
        route: "/exams",
    },
    MenuItem {
        title: "Lab Center",
        route: "/lab",
    },
    MenuItem {
        title: "Score Reports",
        route: "/reports",
    },
    MenuItem {
        title: "Profile",
        route: "/profile",
    },
];

const TEACHER_MENU: &[MenuItem] = &[
    MenuItem {
        title: "Teacher Workspace",
        route: "/teacher",
    },
    MenuItem {
        title: "Question Bank",
        route: "/question-bank",
    },
    MenuItem {
        title: "Exam Management",
        route: "/exam-manage",
    },
    MenuItem {
        title: "Marking Center",
        route: "/marking",
    },
    MenuItem {
        title: "Lab Management",
        route: "/lab-manage",
    },
    MenuItem {
        title: "Lab Review",
        route: "/review-lab",
    },
    MenuItem {
        title: "Student Management",
        route: "/student-manage",
    },
    MenuItem {
        title: "Score Management",
        route: "/score-manage",
    },
];

/// Entry decision for a protected view. Any authenticated session may enter
/// any protected view; anonymous visitors are redirected to the entry point.
pub fn authorize(store: &SessionStore, _view: &str) -> Decision {
    if store.current().is_some() {
        Decision::Allow
    } else {
        Decision::Redirect(ENTRY_POINT.to_string())
    }
}

/// Fixed, role-scoped menu. The two lists share no routes.
pub fn menu_for(role: Role) -> &'static [MenuItem] {
    match role {
        Role::Student => STUDENT_MENU,
        Role::Teacher => TEACHER_MENU,
    }
}

/// Landing route after a successful login.
pub fn home_route(role: Role) -> &'static str {
    match role {
        Role::Student => "/dashboard",
        Role::Teacher => "/teacher",
    }
}
