//! Routes, DOM markers and UI strings of the RavenCode front end
//!
//! The application is localized in Spanish; markers match on visible text.

use crate::driver::Locator;

pub mod paths {
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const FORGOT_PASSWORD: &str = "/forgot-password";
    pub const DASHBOARD: &str = "/dashboard";
    pub const COURSES: &str = "/courses";
    pub const SETTINGS: &str = "/settings";
    pub const MODULE1_INTRO: &str = "/module1/introduction";
    pub const MODULE1_LESSON1: &str = "/module1/lesson1";
    pub const MODULE1_ASSESSMENT: &str = "/module1/assessment";
}

pub mod messages {
    pub const INVALID_LOGIN: &str = "Credenciales inválidas";
    pub const EMAIL_TAKEN: &str = "Email already registered";
    pub const REGISTERED: &str = "registrado exitosamente";
    pub const RECOVERY_SENT: &str = "Código de recuperación enviado";
    pub const PROFILE_UPDATED: &str = "Perfil actualizado exitosamente";
}

/// Any element whose own text contains `text`
pub fn text(text: &str) -> Locator {
    Locator::xpath(format!("//*[contains(text(), '{}')]", text))
}

/// A button whose text content contains `label`
pub fn button(label: &str) -> Locator {
    Locator::xpath(format!("//button[contains(., '{}')]", label))
}

pub fn toast_container() -> Locator {
    Locator::xpath("//*[contains(@class, 'react-hot-toast') or contains(@class, 'toaster')]")
}

pub mod login {
    use super::*;

    pub fn email() -> Locator {
        Locator::id("email")
    }

    pub fn password() -> Locator {
        Locator::id("password")
    }

    pub fn submit() -> Locator {
        button("Iniciar sesión")
    }
}

pub mod register {
    use super::*;

    pub fn heading() -> Locator {
        Locator::xpath("//h2[contains(., 'Crear cuenta') or contains(., 'Registrarse')]")
    }

    pub fn terms() -> Locator {
        Locator::id("terms")
    }

    pub fn submit() -> Locator {
        button("Crear cuenta")
    }
}

pub mod forgot_password {
    use super::*;

    pub fn heading() -> Locator {
        Locator::xpath("//h2[contains(., 'Recuperar') or contains(., 'Olvidaste')]")
    }

    pub fn send() -> Locator {
        Locator::xpath("//button[contains(., 'Enviar código') or contains(., 'Enviar')]")
    }

    pub fn send_code() -> Locator {
        button("Enviar código")
    }
}

pub mod dashboard {
    use super::*;

    pub fn welcome() -> Locator {
        Locator::xpath("//h2[contains(., 'Bienvenido')]")
    }

    pub fn greeting() -> Locator {
        Locator::xpath("//h2[contains(., '¡Bienvenido de nuevo')]")
    }

    pub fn key_sections() -> [Locator; 3] {
        [
            text("Continúa Tu Aventura"),
            text("Fundamentos de Python"),
            text("Logros"),
        ]
    }

    pub fn progress_markers() -> [Locator; 4] {
        [
            text("Progreso"),
            text("%"),
            Locator::xpath("//*[contains(@class, 'progress')]"),
            Locator::xpath("//div[contains(@style, 'width')]"),
        ]
    }
}

pub mod session {
    use super::*;

    pub fn profile_menu() -> Locator {
        Locator::xpath(
            "//button[contains(@class, 'profile') or contains(@aria-label, 'profile')]",
        )
    }

    pub fn logout() -> Locator {
        Locator::xpath("//button[contains(., 'Cerrar sesión')] | //a[contains(., 'Cerrar sesión')]")
    }

    pub fn admin_role() -> Locator {
        text("Administrador")
    }

    pub fn student_role() -> Locator {
        text("Estudiante")
    }

    pub fn admin_link() -> Locator {
        Locator::xpath("//a[contains(@href, '/admin')]")
    }
}

pub mod courses {
    use super::*;

    pub fn heading() -> Locator {
        Locator::xpath("//h1[contains(., 'Cursos')]")
    }

    pub fn module1_card() -> Locator {
        Locator::xpath("//*[normalize-space(text())='Módulo 1: Fundamentos de Python']")
    }

    pub fn module2_card() -> Locator {
        text("Módulo 2")
    }

    pub fn view_contents() -> Locator {
        button("Ver contenidos")
    }

    pub fn view_intro_lesson() -> Locator {
        Locator::xpath(
            "//button[contains(., 'Ver lección')][ancestor::*[contains(., 'Introducción')]]",
        )
    }

    pub fn start_learning() -> Locator {
        button("Inicia tu aprendizaje")
    }
}

pub mod lesson {
    use super::*;

    pub fn numbered(n: usize) -> Locator {
        text(&format!("Lección {}", n))
    }

    pub fn next() -> Locator {
        button("Siguiente")
    }

    pub fn previous() -> Locator {
        Locator::xpath("//button[contains(., 'Anterior') or contains(., 'Atrás')]")
    }

    pub fn challenge() -> Locator {
        button("Reto")
    }

    pub fn challenge_or_assessment() -> Locator {
        Locator::xpath("//button[contains(., 'Reto') or contains(., 'Evaluación')]")
    }
}

pub mod assessment {
    use super::*;

    pub fn module1_title() -> Locator {
        text("Evaluación Juez Módulo 1")
    }

    pub fn module2_title() -> Locator {
        Locator::xpath(
            "//*[contains(text(), 'Evaluación Juez Módulo 2') or contains(text(), 'Módulo 2')]",
        )
    }

    pub fn markers() -> [Locator; 5] {
        [
            text("Evaluación"),
            text("Juez"),
            text("Pregunta"),
            Locator::xpath("//textarea"),
            Locator::xpath("//button[contains(., 'Enviar') or contains(., 'Submit')]"),
        ]
    }
}

pub mod settings {
    use super::*;

    pub const NAME_ID: &str = "Nombre";
    pub const INSTITUTION_ID: &str = "Institucion_educativa";
    pub const GRADE_ID: &str = "Grado_academico";

    pub fn heading() -> Locator {
        Locator::xpath("//h2[contains(., 'Configuración de Perfil')]")
    }

    pub fn name() -> Locator {
        Locator::id(NAME_ID)
    }

    pub fn institution() -> Locator {
        Locator::id(INSTITUTION_ID)
    }

    pub fn grade() -> Locator {
        Locator::id(GRADE_ID)
    }

    pub fn save() -> Locator {
        button("Guardar cambios")
    }
}
