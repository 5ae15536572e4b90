//! Interface translations.
//!
//! Strings are looked up by typed [`Message`] key. A locale without an
//! entry for a key falls back to English.

use std::fmt;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
    Es,
    Zh,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Fr, Locale::Es, Locale::Zh];

    /// Parses a language tag such as `fr` or `fr-FR`. Unknown languages
    /// yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "en" => Some(Locale::En),
            "fr" => Some(Locale::Fr),
            "es" => Some(Locale::Es),
            "zh" => Some(Locale::Zh),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Es => "es",
            Locale::Zh => "zh",
        }
    }

    /// Name of the language in that language.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Fr => "Français",
            Locale::Es => "Español",
            Locale::Zh => "中文",
        }
    }

    /// Best match for the browser language, defaulting to English.
    pub fn detect() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(locale) = web_sys::window()
                .and_then(|w| w.navigator().language())
                .and_then(|tag| Locale::from_tag(&tag))
            {
                return locale;
            }
        }
        Locale::default()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.native_name())
    }
}

/// Translatable interface strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    GardenSpecies,
    Settings,
    BackToGallery,
    VisibilitySettings,
    VisibilityDescription,
    ShowTaxonImage,
    ShowTaxonRange,
    ShowConservationStatus,
    SettingsSaved,
    WikimediaIntegration,
    WikimediaDescription,
    WikimediaUsername,
    WikimediaUsernamePlaceholder,
    InputWikimediaUsername,
}

/// Looks up `message` in `locale`, falling back to English.
pub fn translate(locale: Locale, message: Message) -> &'static str {
    let translated = match locale {
        Locale::En => None,
        Locale::Fr => french(message),
        Locale::Es => spanish(message),
        Locale::Zh => chinese(message),
    };
    translated.unwrap_or_else(|| english(message))
}

fn english(message: Message) -> &'static str {
    use Message::*;
    match message {
        GardenSpecies => "Gardens Havens",
        Settings => "Settings",
        BackToGallery => "Back to Gallery",
        VisibilitySettings => "Visibility Settings",
        VisibilityDescription => "Choose which information to display on species cards",
        ShowTaxonImage => "Taxon image",
        ShowTaxonRange => "Taxon range",
        ShowConservationStatus => "Conservation status",
        SettingsSaved => "Settings are automatically saved",
        WikimediaIntegration => "Wikimedia Integration",
        WikimediaDescription => "Enter your Wikimedia username to load custom species lists",
        WikimediaUsername => "Wikimedia Username",
        WikimediaUsernamePlaceholder => "Enter your username (e.g., Yug)",
        InputWikimediaUsername => "Input your Wikimedia username",
    }
}

fn french(message: Message) -> Option<&'static str> {
    use Message::*;
    Some(match message {
        GardenSpecies => "Jardins Refuges",
        Settings => "Paramètres",
        BackToGallery => "Retour à la galerie",
        VisibilitySettings => "Paramètres de visibilité",
        VisibilityDescription => "Choisissez les informations à afficher sur les cartes des espèces",
        ShowTaxonImage => "Image du taxon",
        ShowTaxonRange => "Aire de répartition du taxon",
        ShowConservationStatus => "Statut de conservation",
        SettingsSaved => "Les paramètres sont enregistrés automatiquement",
        WikimediaIntegration => "Intégration Wikimedia",
        WikimediaDescription => {
            "Entrez votre nom d'utilisateur Wikimedia pour charger des listes d'espèces personnalisées"
        }
        WikimediaUsername => "Nom d'utilisateur Wikimedia",
        WikimediaUsernamePlaceholder => "Entrez votre nom d'utilisateur (ex: Yug)",
        InputWikimediaUsername => return None,
    })
}

fn spanish(message: Message) -> Option<&'static str> {
    use Message::*;
    Some(match message {
        GardenSpecies => "Jardines Refugios",
        Settings => "Configuración",
        BackToGallery => "Volver a la galería",
        VisibilitySettings => "Configuración de visibilidad",
        VisibilityDescription => "Elija qué información mostrar en las tarjetas de especies",
        ShowTaxonImage => "Imagen del taxón",
        ShowTaxonRange => "Rango del taxón",
        ShowConservationStatus => "Estado de conservación",
        SettingsSaved => "La configuración se guarda automáticamente",
        WikimediaIntegration => "Integración Wikimedia",
        WikimediaDescription => {
            "Ingrese su nombre de usuario de Wikimedia para cargar listas de especies personalizadas"
        }
        WikimediaUsername => "Nombre de usuario de Wikimedia",
        WikimediaUsernamePlaceholder => "Ingrese su nombre de usuario (ej: Yug)",
        InputWikimediaUsername => "Ingrese su nombre de usuario de Wikimedia",
    })
}

fn chinese(message: Message) -> Option<&'static str> {
    use Message::*;
    Some(match message {
        GardenSpecies => "花园庇护所",
        Settings => "设置",
        BackToGallery => "返回画廊",
        VisibilitySettings => "可见性设置",
        VisibilityDescription => "选择在物种卡片上显示哪些信息",
        ShowTaxonImage => "分类群图像",
        ShowTaxonRange => "分类群范围",
        ShowConservationStatus => "保护状态",
        SettingsSaved => "设置会自动保存",
        WikimediaIntegration => "维基媒体集成",
        WikimediaDescription => "输入您的维基媒体用户名以加载自定义物种列表",
        WikimediaUsername => "维基媒体用户名",
        WikimediaUsernamePlaceholder => "输入您的用户名 (例如: Yug)",
        InputWikimediaUsername => "输入您的维基媒体用户名",
    })
}
