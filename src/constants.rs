pub mod messages {

    pub const MISSING_FIELDS: &str = "Preencha todos os campos!";

    pub const INVALID_EMAIL: &str = "E-mail inválido";

    pub const UNKNOWN_ACCOUNT_KIND: &str = "Tipo de conta inválido.";

    pub const EMAIL_TAKEN: &str = "Este e-mail já está em uso.";

    pub const INVALID_USERNAME: &str = "O nome de usuário não pode conter \"@\".";

    pub const USERNAME_TAKEN: &str = "Este nome de usuário já está em uso.";

    pub const LICENSE_TAKEN: &str = "Este CRP já está cadastrado.";

    pub const ACCOUNT_TAKEN: &str = "Usuário ou e-mail já existe.";

    pub const LOGIN_REQUIRED: &str = "Usuário e senha são obrigatórios.";

    pub const BAD_CREDENTIALS: &str = "Usuário ou senha incorretos.";

    pub const PROFESSIONAL_NOT_FOUND: &str = "Profissional não encontrado.";

    pub const USER_NOT_FOUND: &str = "Usuário não encontrado.";

    pub const NOTHING_TO_UPDATE: &str = "Nenhum campo para atualizar.";

    pub const EMPTY_ANSWERS: &str = "Responda ao questionário antes de enviar.";

    pub const ASSESSMENT_SAVED: &str = "Questionário enviado com sucesso.";

    pub const EMPTY_MESSAGE: &str = "Mensagem vazia";

    pub const AI_FAILURE: &str = "Erro no servidor ao consultar a IA.";

    pub const AI_NO_REPLY: &str = "⚠️ A IA não respondeu.";

    pub const WELCOME_SENT: &str = "E-mail de boas-vindas enviado";

    pub const MAIL_FAILURE: &str = "Erro interno ao enviar e-mail";

    pub const RATE_LIMITED: &str = "Muitas requisições. Tente novamente em instantes.";

    pub const INTERNAL: &str = "Erro interno no servidor.";

    pub const DB_OK: &str = "Conexão com o PostgreSQL OK";

    pub const DB_DOWN: &str = "ERRO: Falha na conexão com o Banco de Dados.";

    pub const SERVICE_ONLINE: &str = "Serviço Web MindFlow online e pronto!";
}

pub mod prompts {

    pub const CHAT_PREAMBLE: &str = "Você é um assistente de saúde mental empático e acolhedor. \
Ajude o usuário com apoio emocional e orientações leves.";

    pub const ASSESSMENT_PREAMBLE: &str = "Você é um assistente que apoia profissionais de saúde mental. \
Com base nas respostas do questionário de triagem abaixo, escreva um resumo de pré-avaliação \
objetivo, em português, com no máximo dois parágrafos. Não faça diagnósticos.";
}

pub mod mail {

    pub const WELCOME_SUBJECT: &str = "Registro confirmado — MindFlow";
}
