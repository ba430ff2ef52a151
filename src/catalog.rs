//! Static supervision-indicator catalog for tahfidz instructors. Reference
//! data only; the scorer never requires every indicator to be answered.

pub struct Indicator {
    pub category_number: i32,
    pub category_name: &'static str,
    pub indicator_number: i32,
    pub text: &'static str,
}

pub const INDICATORS: &[Indicator] = &[
    Indicator {
        category_number: 1,
        category_name: "Perencanaan Pembelajaran",
        indicator_number: 1,
        text: "Menyusun target hafalan harian dan mingguan santri",
    },
    Indicator {
        category_number: 1,
        category_name: "Perencanaan Pembelajaran",
        indicator_number: 2,
        text: "Menyiapkan jadwal setoran dan murajaah sebelum halaqah",
    },
    Indicator {
        category_number: 1,
        category_name: "Perencanaan Pembelajaran",
        indicator_number: 3,
        text: "Mencatat capaian hafalan santri pada buku mutabaah",
    },
    Indicator {
        category_number: 2,
        category_name: "Pelaksanaan Halaqah",
        indicator_number: 1,
        text: "Membuka halaqah tepat waktu dengan doa dan motivasi",
    },
    Indicator {
        category_number: 2,
        category_name: "Pelaksanaan Halaqah",
        indicator_number: 2,
        text: "Menyimak setoran hafalan santri satu per satu (talaqqi)",
    },
    Indicator {
        category_number: 2,
        category_name: "Pelaksanaan Halaqah",
        indicator_number: 3,
        text: "Membimbing murajaah hafalan lama secara terjadwal",
    },
    Indicator {
        category_number: 2,
        category_name: "Pelaksanaan Halaqah",
        indicator_number: 4,
        text: "Mengelola ketertiban halaqah selama pembelajaran",
    },
    Indicator {
        category_number: 3,
        category_name: "Penguasaan Materi",
        indicator_number: 1,
        text: "Mencontohkan bacaan dengan tajwid yang benar",
    },
    Indicator {
        category_number: 3,
        category_name: "Penguasaan Materi",
        indicator_number: 2,
        text: "Mengoreksi makharijul huruf santri dengan tepat",
    },
    Indicator {
        category_number: 3,
        category_name: "Penguasaan Materi",
        indicator_number: 3,
        text: "Menguasai hafalan pada juz yang diampu",
    },
    Indicator {
        category_number: 4,
        category_name: "Evaluasi",
        indicator_number: 1,
        text: "Melaksanakan ujian tasmi per juz sesuai jadwal",
    },
    Indicator {
        category_number: 4,
        category_name: "Evaluasi",
        indicator_number: 2,
        text: "Melaporkan perkembangan hafalan kepada wali santri",
    },
    Indicator {
        category_number: 5,
        category_name: "Kepribadian",
        indicator_number: 1,
        text: "Menjadi teladan adab dan akhlak bagi santri",
    },
    Indicator {
        category_number: 5,
        category_name: "Kepribadian",
        indicator_number: 2,
        text: "Hadir dan disiplin dalam seluruh kegiatan halaqah",
    },
];

pub fn find(category_number: i32, indicator_number: i32) -> Option<&'static Indicator> {
    INDICATORS
        .iter()
        .find(|i| i.category_number == category_number && i.indicator_number == indicator_number)
}

pub fn category_name(category_number: i32) -> Option<&'static str> {
    INDICATORS
        .iter()
        .find(|i| i.category_number == category_number)
        .map(|i| i.category_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_numbers_are_unique_within_category() {
        for (index, a) in INDICATORS.iter().enumerate() {
            for b in &INDICATORS[index + 1..] {
                assert!(
                    a.category_number != b.category_number
                        || a.indicator_number != b.indicator_number
                );
            }
        }
    }

    #[test]
    fn lookup_finds_known_indicator() {
        let indicator = find(2, 2).unwrap();
        assert_eq!(indicator.category_name, "Pelaksanaan Halaqah");
        assert!(find(9, 1).is_none());
    }

    #[test]
    fn category_names_resolve() {
        assert_eq!(category_name(5), Some("Kepribadian"));
        assert_eq!(category_name(6), None);
    }
}
