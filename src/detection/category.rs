use serde::Serialize;

use crate::model::color::{ColorError, HexColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryIcon {
    Wrench,
    Sparkles,
    Car,
    Hammer,
    Paintbrush,
    Package,
    Zap,
    Scissors,
    GraduationCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub icon: CategoryIcon,
    pub color: HexColor,
    pub name: &'static str,
}

pub const GENERAL_CATEGORY: CategoryInfo = CategoryInfo {
    icon: CategoryIcon::Package,
    color: HexColor::rgb(0x64, 0x74, 0x8b),
    name: "Geral",
};

/// Evaluated top to bottom, first row with a matching keyword wins. Some
/// descriptions match several rows ("motor" and "tinta"), so order matters.
const CATEGORY_TABLE: &[(&[&str], CategoryInfo)] = &[
    (
        &[
            "óleo",
            "filtro",
            "pneu",
            "freio",
            "embreagem",
            "diagnóstico",
            "injetor",
            "motor",
            "suspensão",
        ],
        CategoryInfo {
            icon: CategoryIcon::Wrench,
            color: HexColor::rgb(0xef, 0x44, 0x44),
            name: "Automotivo - Mecânica",
        },
    ),
    (
        &["lavagem", "polimento", "enceramento", "detalhamento"],
        CategoryInfo {
            icon: CategoryIcon::Sparkles,
            color: HexColor::rgb(0x3b, 0x82, 0xf6),
            name: "Automotivo - Estética",
        },
    ),
    (
        &["som", "alarme", "ar condicionado"],
        CategoryInfo {
            icon: CategoryIcon::Car,
            color: HexColor::rgb(0x63, 0x66, 0xf1),
            name: "Automotivo - Acessórios",
        },
    ),
    (
        &[
            "piso",
            "cerâmic",
            "azulejo",
            "reboco",
            "massa",
            "parede",
            "laje",
            "pedreiro",
            "cimento",
            "argamassa",
        ],
        CategoryInfo {
            icon: CategoryIcon::Hammer,
            color: HexColor::rgb(0xf5, 0x9e, 0x0b),
            name: "Construção - Obra",
        },
    ),
    (
        &["pintura", "tinta", "látex"],
        CategoryInfo {
            icon: CategoryIcon::Paintbrush,
            color: HexColor::rgb(0xec, 0x48, 0x99),
            name: "Construção - Pintura",
        },
    ),
    (
        &["porta", "janela", "acabamento", "gesso"],
        CategoryInfo {
            icon: CategoryIcon::Package,
            color: HexColor::rgb(0x8b, 0x5c, 0xf6),
            name: "Construção - Acabamento",
        },
    ),
    (
        &[
            "elétric",
            "tomada",
            "disjuntor",
            "chuveiro",
            "ventilador",
            "ponto elétrico",
            "fio",
            "fiação",
        ],
        CategoryInfo {
            icon: CategoryIcon::Zap,
            color: HexColor::rgb(0xfb, 0xbf, 0x24),
            name: "Elétrica",
        },
    ),
    (
        &["computador", "notebook", "formatação", "rede", "wi-fi", "tela"],
        CategoryInfo {
            icon: CategoryIcon::Zap,
            color: HexColor::rgb(0x10, 0xb9, 0x81),
            name: "Tecnologia",
        },
    ),
    (
        &[
            "cabelo",
            "corte",
            "barba",
            "manicure",
            "pedicure",
            "unhas",
            "sobrancelha",
            "maquiagem",
            "escova",
            "coloração",
            "hidratação",
        ],
        CategoryInfo {
            icon: CategoryIcon::Scissors,
            color: HexColor::rgb(0xf4, 0x72, 0xb6),
            name: "Beleza & Estética",
        },
    ),
    (
        &["aula", "consultoria", "treinamento", "curso"],
        CategoryInfo {
            icon: CategoryIcon::GraduationCap,
            color: HexColor::rgb(0x63, 0x66, 0xf1),
            name: "Educação",
        },
    ),
];

/// Picks the icon and tint shown next to a line item.
pub fn detect_category(description: &str) -> CategoryInfo {
    let lowered = description.to_lowercase();
    CATEGORY_TABLE
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, info)| *info)
        .unwrap_or(GENERAL_CATEGORY)
}

impl HexColor {
    /// Moves every channel toward white (positive percent) or black
    /// (negative percent). The percent is clamped to `[-100, 100]`.
    pub fn adjust_brightness(self, percent: f64) -> HexColor {
        let percent = if percent.is_nan() { 0.0 } else { percent.clamp(-100.0, 100.0) };
        let factor = percent / 100.0;

        let adjust = |value: u8| -> u8 {
            let v = value as f64;
            let adjusted = if factor >= 0.0 {
                v + (255.0 - v) * factor
            } else {
                v + v * factor
            };
            adjusted.round().clamp(0.0, 255.0) as u8
        };

        HexColor::rgb(adjust(self.r), adjust(self.g), adjust(self.b))
    }
}

pub fn adjust_color_brightness(hex: &str, percent: f64) -> Result<HexColor, ColorError> {
    Ok(HexColor::parse(hex)?.adjust_brightness(percent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_categories() {
        assert_eq!(detect_category("Troca de Óleo").name, "Automotivo - Mecânica");
        assert_eq!(detect_category("Polimento completo").name, "Automotivo - Estética");
        assert_eq!(detect_category("Instalação de alarme").name, "Automotivo - Acessórios");
        assert_eq!(detect_category("Assentamento de PISO").name, "Construção - Obra");
        assert_eq!(detect_category("Pintura externa").name, "Construção - Pintura");
        assert_eq!(detect_category("Instalação de janela").name, "Construção - Acabamento");
        assert_eq!(detect_category("Troca de disjuntor").name, "Elétrica");
        assert_eq!(detect_category("Formatação de notebook").name, "Tecnologia");
        assert_eq!(detect_category("Design de sobrancelha").name, "Beleza & Estética");
        assert_eq!(detect_category("Aula particular").name, "Educação");
    }

    #[test]
    fn test_first_row_wins() {
        // "motor" (mechanics) comes before "tinta" (painting)
        let info = detect_category("Pintura do motor com tinta especial");
        assert_eq!(info.name, "Automotivo - Mecânica");
        assert_eq!(info.icon, CategoryIcon::Wrench);
        assert_eq!(info.color.to_string(), "#ef4444");
    }

    #[test]
    fn test_default_category() {
        assert_eq!(detect_category(""), GENERAL_CATEGORY);
        assert_eq!(detect_category("Visita técnica"), GENERAL_CATEGORY);
        assert_eq!(detect_category("xyz"), detect_category("xyz"));
    }

    #[test]
    fn test_brightness_identity_and_extremes() {
        assert_eq!(adjust_color_brightness("#0D9B5C", 0.0).unwrap().to_string(), "#0d9b5c");
        assert_eq!(adjust_color_brightness("#000000", 100.0).unwrap().to_string(), "#ffffff");
        assert_eq!(adjust_color_brightness("#ffffff", -100.0).unwrap().to_string(), "#000000");
        assert_eq!(adjust_color_brightness("#123456", 400.0).unwrap().to_string(), "#ffffff");
        assert!(adjust_color_brightness("not a color", 10.0).is_err());
    }

    #[test]
    fn test_brightness_is_monotonic() {
        let base = HexColor::parse("#0d9b5c").unwrap();
        let mut previous = base.adjust_brightness(-100.0);
        for step in -99..=100 {
            let next = base.adjust_brightness(step as f64);
            assert!(next.r >= previous.r && next.g >= previous.g && next.b >= previous.b);
            previous = next;
        }
    }

    #[test]
    fn test_brightness_round_trip_stays_close() {
        let base = HexColor::parse("#0d9b5c").unwrap();
        let lighter = base.adjust_brightness(15.0);
        assert_eq!(lighter.to_string(), "#31aa74");
        let back = lighter.adjust_brightness(-15.0);
        assert!(back.r <= lighter.r && back.g <= lighter.g && back.b <= lighter.b);
    }
}
