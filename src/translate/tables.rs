use super::topics::Topic;

/// Rule identifiers (axe-core / Lighthouse audit ids) with a known topic.
pub(crate) const CODE_TOPICS: &[(&str, Topic)] = &[
    ("landmark-one-main", Topic::Landmark),
    ("list", Topic::ListStructure),
    ("listitem", Topic::ListStructure),
    ("heading-order", Topic::HeadingOrder),
    ("color-contrast", Topic::Contrast),
    ("link-name", Topic::LinkText),
    ("label", Topic::FormLabel),
    ("image-alt", Topic::AltText),
];

/// Rule identifiers without a topic template but with a translated title.
pub(crate) const CODE_TITLES: &[(&str, &str)] = &[
    ("aria-allowed-attr", "Attributs ARIA incorrects"),
    ("aria-valid-attr-value", "Attributs ARIA incorrects"),
    ("button-name", "Boutons sans nom accessible"),
    ("document-title", "Page sans balise <title>"),
    ("html-has-lang", "Langue de la page non déclarée"),
    ("meta-viewport", "Zoom bloqué sur mobile"),
];

/// English audit titles as reported by Lighthouse.
pub(crate) const TITLE_TRANSLATIONS: &[(&str, &str)] = &[
    ("Document does not have a main landmark", "Pas de balise <main> principale"),
    ("Lists do not contain only <li> elements", "Listes mal structurées"),
    ("Heading elements are not in a sequentially-descending order", "Titres dans le désordre (H1, H2, H3...)"),
    ("Background and foreground colors do not have a sufficient contrast ratio", "Contraste des couleurs insuffisant"),
    ("Links do not have a discernible name", "Liens sans texte descriptif"),
    ("Form elements do not have associated labels", "Champs de formulaire sans labels"),
    ("Image elements do not have [alt] attributes", "Images sans attribut alt"),
    ("[aria-*] attributes do not match their roles", "Attributs ARIA incorrects"),
    ("Buttons do not have an accessible name", "Boutons sans nom accessible"),
];

pub(crate) fn lookup<'a, V: Copy>(table: &'a [(&'a str, V)], key: &str) -> Option<V> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
