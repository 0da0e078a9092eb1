//! Framework-shaped stubs written by the builtin scaffolder in place of
//! `make:model`, `make:migration`, `make:request` and `make:resource`.

pub(super) const MODEL: &str = r#"<?php

namespace {{rootNamespace}}\Models;

use Illuminate\Database\Eloquent\Factories\HasFactory;
use Illuminate\Database\Eloquent\Model;

class {{name}} extends Model
{
    use HasFactory;
}
"#;

pub(super) const MIGRATION: &str = r#"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    /**
     * Run the migrations.
     */
    public function up(): void
    {
        Schema::create('{{tableName}}', function (Blueprint $table) {
            $table->id();
            $table->string('name');
            $table->text('description')->nullable();
            $table->timestamps();
            $table->softDeletes();
        });
    }

    /**
     * Reverse the migrations.
     */
    public function down(): void
    {
        Schema::dropIfExists('{{tableName}}');
    }
};
"#;

pub(super) const FORM_REQUEST: &str = r#"<?php

namespace {{namespace}};

use Illuminate\Foundation\Http\FormRequest;

class {{className}} extends FormRequest
{
    /**
     * Determine if the user is authorized to make this request.
     */
    public function authorize(): bool
    {
        return true;
    }

    /**
     * Get the validation rules that apply to the request.
     *
     * @return array<string, \Illuminate\Contracts\Validation\ValidationRule|array<mixed>|string>
     */
    public function rules(): array
    {
        return [
            'name' => 'required|string|max:255',
            'description' => 'nullable|string',
        ];
    }
}
"#;

pub(super) const JSON_RESOURCE: &str = r#"<?php

namespace {{namespace}};

use Illuminate\Http\Request;
use Illuminate\Http\Resources\Json\JsonResource;

class {{className}} extends JsonResource
{
    /**
     * Transform the resource into an array.
     *
     * @return array<string, mixed>
     */
    public function toArray(Request $request): array
    {
        return parent::toArray($request);
    }
}
"#;
