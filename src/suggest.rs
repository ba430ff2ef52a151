//! Template-based suggestion text for activity-report descriptions and RAB
//! justifications. Keyword matching over static tables, first match wins;
//! no inference of any kind.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuggestionKind {
    Activity,
    Rab,
}

struct Template {
    keywords: &'static [&'static str],
    body: &'static str,
}

const ACTIVITY_TEMPLATES: &[Template] = &[
    Template {
        keywords: &["rapat", "musyawarah"],
        body: "Kegiatan {title} dilaksanakan untuk mengkoordinasikan program kerja antar bagian. \
               Rapat dihadiri oleh seluruh pengurus terkait dan menghasilkan kesepakatan yang \
               ditindaklanjuti pada pekan berikutnya.",
    },
    Template {
        keywords: &["pelatihan", "workshop", "diklat"],
        body: "Kegiatan {title} diselenggarakan untuk meningkatkan kompetensi guru dan tenaga \
               kependidikan. Peserta mengikuti seluruh sesi dan hasil pelatihan diterapkan dalam \
               pembelajaran sehari-hari.",
    },
    Template {
        keywords: &["ujian", "tasmi", "evaluasi"],
        body: "Kegiatan {title} dilaksanakan sebagai evaluasi capaian santri. Pelaksanaan berjalan \
               tertib sesuai jadwal dan hasilnya dilaporkan kepada wali santri serta pimpinan.",
    },
    Template {
        keywords: &["wisuda", "khataman", "haflah"],
        body: "Kegiatan {title} merupakan puncak apresiasi atas capaian hafalan santri. Acara \
               dihadiri wali santri dan berjalan khidmat sesuai susunan acara.",
    },
    Template {
        keywords: &["pengajian", "kajian", "tabligh"],
        body: "Kegiatan {title} dilaksanakan untuk pembinaan ruhiyah warga pesantren. Jamaah \
               mengikuti kajian dengan antusias hingga selesai.",
    },
];

const RAB_TEMPLATES: &[Template] = &[
    Template {
        keywords: &["pembangunan", "renovasi", "perbaikan"],
        body: "Anggaran {title} diajukan untuk menjaga kelayakan sarana pesantren. Pekerjaan \
               dilaksanakan bertahap dengan mengutamakan kebutuhan yang paling mendesak.",
    },
    Template {
        keywords: &["mushaf", "kitab", "buku", "atk"],
        body: "Anggaran {title} diajukan untuk pengadaan penunjang pembelajaran santri. Jumlah \
               pengadaan disesuaikan dengan jumlah santri aktif pada periode berjalan.",
    },
    Template {
        keywords: &["honor", "bisyaroh", "gaji"],
        body: "Anggaran {title} diajukan untuk kesejahteraan asatidz sesuai ketentuan yayasan dan \
               beban mengajar masing-masing.",
    },
    Template {
        keywords: &["konsumsi", "akomodasi", "transport"],
        body: "Anggaran {title} diajukan untuk mendukung kelancaran kegiatan sesuai jumlah peserta \
               dan standar biaya yang berlaku.",
    },
];

const ACTIVITY_FALLBACK: &str =
    "Kegiatan {title} telah dilaksanakan sesuai rencana dan berjalan dengan lancar. Hasil \
     kegiatan dilaporkan kepada yayasan sebagai bahan evaluasi program berikutnya.";

const RAB_FALLBACK: &str =
    "Anggaran {title} diajukan untuk menunjang kelancaran program pesantren pada periode \
     berjalan, dengan rincian biaya sesuai kebutuhan di lapangan.";

pub fn suggest(kind: SuggestionKind, title: &str) -> String {
    let (templates, fallback) = match kind {
        SuggestionKind::Activity => (ACTIVITY_TEMPLATES, ACTIVITY_FALLBACK),
        SuggestionKind::Rab => (RAB_TEMPLATES, RAB_FALLBACK),
    };

    let needle = title.to_lowercase();
    let body = templates
        .iter()
        .find(|t| t.keywords.iter().any(|k| needle.contains(k)))
        .map(|t| t.body)
        .unwrap_or(fallback);

    body.replace("{title}", title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_picks_template() {
        let text = suggest(SuggestionKind::Activity, "Rapat Koordinasi Bulanan");
        assert!(text.contains("Rapat Koordinasi Bulanan"));
        assert!(text.contains("program kerja"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let text = suggest(SuggestionKind::Rab, "PEMBANGUNAN Asrama Putra");
        assert!(text.contains("kelayakan sarana"));
    }

    #[test]
    fn unmatched_title_uses_fallback() {
        let text = suggest(SuggestionKind::Activity, "Studi Banding");
        assert!(text.contains("Studi Banding"));
        assert!(text.contains("sesuai rencana"));
    }

    #[test]
    fn first_matching_keyword_wins() {
        // "pelatihan" appears before "ujian" in table order
        let a = suggest(SuggestionKind::Activity, "Pelatihan Penguji Ujian Tasmi");
        let b = suggest(SuggestionKind::Activity, "Pelatihan Tahsin");
        assert_eq!(
            a.replace("Pelatihan Penguji Ujian Tasmi", "{t}"),
            b.replace("Pelatihan Tahsin", "{t}")
        );
    }

    #[test]
    fn suggestion_is_deterministic() {
        let first = suggest(SuggestionKind::Rab, "Pengadaan Mushaf");
        let second = suggest(SuggestionKind::Rab, "Pengadaan Mushaf");
        assert_eq!(first, second);
    }
}
