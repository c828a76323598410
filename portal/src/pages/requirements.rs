/// An entry of the enrollment requirements checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement(pub &'static str);

impl Requirement {
    /// Entries that only apply to a specific year and are highlighted.
    pub fn is_special(&self) -> bool {
        self.0.contains("CASO 5TO AÑO")
    }
}

pub const REQUIREMENTS_PRIMARY: [Requirement; 10] = [
    Requirement("Partida de nacimiento del estudiante (fotocopia y original). (En caso de nuevo ingreso o no consignado anteriormente)."),
    Requirement("Fotocopia nítida de la Cédula de identidad (niños mayores de 10 años)."),
    Requirement("Fotocopia nítida de la Cédula de Identidad del representante."),
    Requirement("Certificado de Aprendizaje (solo para estudiantes nuevo ingreso)."),
    Requirement("Descripción de Avances Pedagógicos del III momento."),
    Requirement("Tres (03) fotos tipo carnet del estudiante y dos (02) del representante legal."),
    Requirement("Copia del Certificado de vacunación (para niños y niñas del 1er grado)."),
    Requirement("De no ser el padre o la madre: Autorización Notariada como representante (copia con vista al original)."),
    Requirement("Constancia de Retiro del Sistema de Gestión Escolar (SIGE), expedida por el Plantel de Procedencia (si es nuevo ingreso)."),
    Requirement("Informe médico o de especialista (para estudiantes con casos especiales de salud)."),
];

pub const REQUIREMENTS_SECONDARY: [Requirement; 11] = [
    Requirement("Certificado de aprobación de 6to Grado (solo para nuevo ingreso al 1er Año)."),
    Requirement("Notas Certificadas expedidas por el plantel de procedencia (para nuevo ingreso de 2do a 5to Año)."),
    Requirement("Original y copia nítida de la Partida de Nacimiento (En caso de nuevo ingreso o no consignado anteriormente)."),
    Requirement("Dos (02) fotocopias nítidas y ampliadas de la Cédula de Identidad del estudiante."),
    Requirement("Dos (02) fotocopias nítidas y ampliadas de la Cédula de Identidad del representante."),
    Requirement("CASO 5TO AÑO: Cuatro (04) fotocopias nítidas y ampliadas de la Cédula de Identidad del estudiante."),
    Requirement("Dos (02) fotos recientes, tipo carnet, del estudiante y dos (02) del representante legal."),
    Requirement("Original y copia del Boletín de Calificaciones del año anterior."),
    Requirement("Constancia de Retiro del Sistema de Gestión Escolar (SIGE), expedida por el Plantel de Procedencia (si es nuevo ingreso)."),
    Requirement("De no ser el padre o la madre: Autorización Notariada como representante (copia con vista al original)."),
    Requirement("Informe médico o de especialista (para estudiantes con casos especiales de salud)."),
];
